use crate::adapters::database::records::RoomRecord;
use crate::domain::Room;
use crate::error::Result;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct RoomRepository {}

impl RoomRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Inserts a new room. The `UNIQUE` constraint on `room_code` is the
    /// authoritative uniqueness guarantee; callers retry on violation.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the insert fails, including unique violations.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn create(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        code: &str,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<Room> {
        let record = sqlx::query_as::<_, RoomRecord>(
            r"
            INSERT INTO rooms (id, room_code, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, room_code, created_at, expires_at
            ",
        )
        .bind(id)
        .bind(code)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(conn)
        .await?;

        Ok(record.into())
    }

    /// Finds a room by its (already normalized) code. No expiry filter: the
    /// caller decides how to treat expired rooms.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_code(&self, conn: &mut PgConnection, code: &str) -> Result<Option<Room>> {
        let record = sqlx::query_as::<_, RoomRecord>(
            "SELECT id, room_code, created_at, expires_at FROM rooms WHERE room_code = $1",
        )
        .bind(code)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Deletes a room row. Returns whether a row was actually removed, so
    /// callers racing the sweeper can treat an absent room as a no-op.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the deletion fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn delete(&self, conn: &mut PgConnection, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1").bind(id).execute(conn).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetches the ids of all rooms expired as of `now`.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn fetch_expired(&self, conn: &mut PgConnection, now: OffsetDateTime) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM rooms WHERE expires_at < $1")
            .bind(now)
            .fetch_all(conn)
            .await?;

        Ok(ids)
    }
}
