use async_trait::async_trait;
use bytes::Bytes;
use droproom_server::adapters::database::file_repo::FileRepository;
use droproom_server::adapters::storage::ObjectStorage;
use droproom_server::domain::Room;
use droproom_server::error::{AppError, Result};
use droproom_server::services::FileService;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

mod common;

/// In-memory store that records every call, with optional fault injection
/// for the signing path.
#[derive(Debug, Default)]
struct RecordingStore {
    puts: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    fail_presign: bool,
}

#[async_trait]
impl ObjectStorage for RecordingStore {
    async fn put(&self, key: &str, _content_type: &str, _body: Bytes) -> Result<()> {
        self.puts.lock().expect("lock poisoned").push(key.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.deletes.lock().expect("lock poisoned").push(key.to_string());
        Ok(())
    }

    async fn presign_get(&self, key: &str, _ttl: StdDuration) -> Result<String> {
        if self.fail_presign {
            Err(AppError::Storage("signer unavailable".to_string()))
        } else {
            Ok(format!("https://signed.test/{key}"))
        }
    }
}

fn unpersisted_room() -> Room {
    let now = OffsetDateTime::now_utc();
    Room {
        id: Uuid::new_v4(),
        code: Uuid::new_v4().simple().to_string()[..6].to_ascii_uppercase(),
        created_at: now,
        expires_at: now + Duration::minutes(30),
    }
}

async fn persist_room(pool: &sqlx::PgPool, room: &Room) {
    sqlx::query("INSERT INTO rooms (id, room_code, created_at, expires_at) VALUES ($1, $2, $3, $4)")
        .bind(room.id)
        .bind(&room.code)
        .bind(room.created_at)
        .bind(room.expires_at)
        .execute(pool)
        .await
        .expect("room insert failed");
}

#[tokio::test]
async fn test_failed_metadata_write_removes_stored_object() {
    common::setup_tracing();
    let config = common::get_test_config();
    let pool = common::get_test_pool(&config.database.url).await;

    let store = Arc::new(RecordingStore::default());
    let service =
        FileService::new(pool.clone(), FileRepository::new(), Arc::clone(&store) as Arc<dyn ObjectStorage>, config.uploads);

    // The room row is never persisted, so the metadata insert fails its
    // foreign key check after the bytes are already in the store.
    let room = unpersisted_room();

    let err = service
        .upload(&room, "report.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.4"))
        .await
        .expect_err("upload must fail without a room row");
    assert!(matches!(err, AppError::Database(_)), "unexpected error: {err:?}");

    let puts = store.puts.lock().expect("lock poisoned").clone();
    let deletes = store.deletes.lock().expect("lock poisoned").clone();
    assert_eq!(puts.len(), 1, "exactly one object should have been stored");
    assert_eq!(puts, deletes, "the stored object must be deleted again");

    let rows: i64 = sqlx::query_scalar("SELECT count(*) FROM files WHERE room_id = $1")
        .bind(room.id)
        .fetch_one(&pool)
        .await
        .expect("count query failed");
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn test_presign_failure_yields_no_signed_url() {
    common::setup_tracing();
    let config = common::get_test_config();
    let pool = common::get_test_pool(&config.database.url).await;

    let store = Arc::new(RecordingStore { fail_presign: true, ..RecordingStore::default() });
    let service =
        FileService::new(pool.clone(), FileRepository::new(), Arc::clone(&store) as Arc<dyn ObjectStorage>, config.uploads);

    let room = unpersisted_room();
    persist_room(&pool, &room).await;

    let uploaded = service
        .upload(&room, "photo.png", "image/png", Bytes::from_static(b"png-bytes"))
        .await
        .expect("upload should succeed even when signing fails");
    assert!(uploaded.signed_url.is_none(), "failed signing must degrade the link, not the upload");
    assert_eq!(uploaded.file.file_name, "photo.png");

    let listed = service.list_files(room.id).await.expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert!(listed[0].signed_url.is_none());
    assert_eq!(listed[0].file.id, uploaded.file.id);
}
