use crate::adapters::database::records::FileRecord;
use crate::domain::StoredFile;
use crate::error::Result;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct FileRepository {}

impl FileRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Records an uploaded file. Called only after the bytes have been
    /// persisted to object storage.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the insert fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn create(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        room_id: Uuid,
        file_name: &str,
        file_path: &str,
        uploaded_at: OffsetDateTime,
    ) -> Result<StoredFile> {
        let record = sqlx::query_as::<_, FileRecord>(
            r"
            INSERT INTO files (id, room_id, file_name, file_path, uploaded_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, room_id, file_name, file_path, uploaded_at
            ",
        )
        .bind(id)
        .bind(room_id)
        .bind(file_name)
        .bind(file_path)
        .bind(uploaded_at)
        .fetch_one(conn)
        .await?;

        Ok(record.into())
    }

    /// Lists a room's files, newest first. A fresh call re-reads current
    /// state, which is what the polling read path wants.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn list_for_room(&self, conn: &mut PgConnection, room_id: Uuid) -> Result<Vec<StoredFile>> {
        let records = sqlx::query_as::<_, FileRecord>(
            r"
            SELECT id, room_id, file_name, file_path, uploaded_at
            FROM files
            WHERE room_id = $1
            ORDER BY uploaded_at DESC
            ",
        )
        .bind(room_id)
        .fetch_all(conn)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Fetches only the storage keys for a room's files, for teardown.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn list_paths_for_room(&self, conn: &mut PgConnection, room_id: Uuid) -> Result<Vec<String>> {
        let paths = sqlx::query_scalar::<_, String>("SELECT file_path FROM files WHERE room_id = $1")
            .bind(room_id)
            .fetch_all(conn)
            .await?;

        Ok(paths)
    }

    /// Deletes all file rows for a room. Returns the number of rows removed.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the deletion fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn delete_for_room(&self, conn: &mut PgConnection, room_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM files WHERE room_id = $1").bind(room_id).execute(conn).await?;
        Ok(result.rows_affected())
    }
}
