use crate::adapters::database::DbPool;
use crate::adapters::database::file_repo::FileRepository;
use crate::adapters::storage::ObjectStorage;
use crate::config::UploadConfig;
use crate::domain::{Room, StoredFile};
use crate::error::{AppError, Result};
use bytes::Bytes;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram},
};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use time::OffsetDateTime;
use uuid::Uuid;

/// Content types accepted for upload: images and PDFs.
pub const ALLOWED_CONTENT_TYPES: [&str; 5] =
    ["image/jpeg", "image/png", "image/gif", "image/webp", "application/pdf"];

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) uploaded_bytes: Counter<u64>,
    pub(crate) upload_size_bytes: Histogram<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("droproom-server");
        Self {
            uploaded_bytes: meter
                .u64_counter("files_uploaded_bytes")
                .with_description("Total bytes of files uploaded")
                .build(),
            upload_size_bytes: meter
                .u64_histogram("files_upload_size_bytes")
                .with_description("Distribution of file upload sizes")
                .build(),
        }
    }
}

/// A file record together with a freshly signed download URL. The URL is
/// `None` when signing failed; a degraded link never fails the whole read.
#[derive(Debug, Clone)]
pub struct FileWithUrl {
    pub file: StoredFile,
    pub signed_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FileService {
    pool: DbPool,
    repo: FileRepository,
    store: Arc<dyn ObjectStorage>,
    config: UploadConfig,
    metrics: Metrics,
}

impl FileService {
    #[must_use]
    pub fn new(pool: DbPool, repo: FileRepository, store: Arc<dyn ObjectStorage>, config: UploadConfig) -> Self {
        Self { pool, repo, store, config, metrics: Metrics::new() }
    }

    /// Uploads a file into a room: bytes to object storage first, metadata
    /// row second, with a compensating object delete if the row write fails.
    /// That order guarantees a metadata row never exists without its bytes.
    ///
    /// # Errors
    /// Returns `AppError::RoomExpired` if the room is logically expired,
    /// `AppError::BadRequest` for a disallowed content type or oversized
    /// body, and `AppError::Storage`/`AppError::Database` on upstream failure.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, room, data),
        fields(room_id = %room.id, file_size = data.len())
    )]
    pub async fn upload(
        &self,
        room: &Room,
        declared_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<FileWithUrl> {
        let now = OffsetDateTime::now_utc();
        if room.is_expired_at(now) {
            return Err(AppError::RoomExpired);
        }

        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(AppError::BadRequest("File type not allowed. Only images and PDFs are accepted.".into()));
        }

        if data.len() > self.config.max_size_bytes {
            return Err(AppError::BadRequest(format!(
                "File too large. Max {} bytes.",
                self.config.max_size_bytes
            )));
        }

        let size = data.len();
        let key = object_key(room.id, now, declared_name);

        self.store.put(&key, content_type, data).await?;

        let mut conn = self.pool.acquire().await?;
        let file = match self.repo.create(&mut conn, Uuid::new_v4(), room.id, declared_name, &key, now).await {
            Ok(file) => file,
            Err(e) => {
                // Roll back phase 1: the stored bytes must not outlive the
                // failed metadata write.
                if let Err(del_err) = self.store.delete(&key).await {
                    tracing::error!(error = %del_err, key = %key, "Failed to remove orphaned object after metadata write failure");
                }
                return Err(e);
            }
        };

        self.metrics.uploaded_bytes.add(size as u64, &[]);
        self.metrics.upload_size_bytes.record(size as u64, &[]);
        tracing::debug!(file_id = %file.id, key = %key, "File uploaded");

        let signed_url = self.presign(&key).await;
        Ok(FileWithUrl { file, signed_url })
    }

    /// Lists a room's files newest-first, each with a freshly signed URL.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn list_files(&self, room_id: Uuid) -> Result<Vec<FileWithUrl>> {
        let mut conn = self.pool.acquire().await?;
        let files = self.repo.list_for_room(&mut conn, room_id).await?;
        drop(conn);

        let mut out = Vec::with_capacity(files.len());
        for file in files {
            let signed_url = self.presign(&file.file_path).await;
            out.push(FileWithUrl { file, signed_url });
        }

        Ok(out)
    }

    /// Tears down all files for a room: best-effort object deletes, then the
    /// metadata rows. Safe on a room with zero files and safe to race with
    /// another teardown of the same room.
    ///
    /// # Errors
    /// Returns `AppError::Database` if a row operation fails. Individual
    /// object-delete failures are logged and skipped: a missing object is
    /// not fatal to room teardown.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete_for_room(&self, room_id: Uuid) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        let paths = self.repo.list_paths_for_room(&mut conn, room_id).await?;

        for path in &paths {
            if let Err(e) = self.store.delete(path).await {
                tracing::warn!(error = %e, key = %path, "Object delete failed during room teardown");
            }
        }

        let removed = self.repo.delete_for_room(&mut conn, room_id).await?;
        if removed > 0 {
            tracing::debug!(removed, "File records deleted");
        }
        Ok(removed)
    }

    async fn presign(&self, key: &str) -> Option<String> {
        match self.store.presign_get(key, StdDuration::from_secs(self.config.signed_url_ttl_secs)).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Signed URL generation failed");
                None
            }
        }
    }
}

/// Builds the storage key for an upload: `rooms/{room_id}/{millis}_{name}`,
/// with the client name reduced to `[A-Za-z0-9._-]`.
fn object_key(room_id: Uuid, uploaded_at: OffsetDateTime, declared_name: &str) -> String {
    let millis = uploaded_at.unix_timestamp_nanos() / 1_000_000;
    format!("rooms/{room_id}/{millis}_{}", sanitize_file_name(declared_name))
}

fn sanitize_file_name(name: &str) -> String {
    name.chars().map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' }).collect()
}
