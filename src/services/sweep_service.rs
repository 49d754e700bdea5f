use crate::adapters::database::DbPool;
use crate::adapters::database::room_repo::RoomRepository;
use crate::error::Result;
use crate::services::room_service::RoomService;
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub struct SweepService {
    pool: DbPool,
    repo: RoomRepository,
    rooms: RoomService,
}

impl SweepService {
    #[must_use]
    pub const fn new(pool: DbPool, repo: RoomRepository, rooms: RoomService) -> Self {
        Self { pool, repo, rooms }
    }

    /// Reaps all rooms expired as of `now` and returns how many were
    /// actually deleted. Each room's teardown is independent: a failure on
    /// one room is logged and the sweep moves on to the next. A room already
    /// removed by a racing delete counts as a no-op, not an error.
    ///
    /// # Errors
    /// Returns `AppError::Database` only if the initial expired-room query
    /// fails; per-room failures never abort the sweep.
    #[tracing::instrument(err, skip(self), fields(expired_count = tracing::field::Empty))]
    pub async fn sweep(&self, now: OffsetDateTime) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        let expired = self.repo.fetch_expired(&mut conn, now).await?;
        drop(conn);

        tracing::Span::current().record("expired_count", expired.len());
        if expired.is_empty() {
            return Ok(0);
        }
        tracing::info!(count = expired.len(), "Found expired rooms to reap");

        let mut deleted = 0;
        for room_id in expired {
            match self.rooms.delete_room_by_id(room_id).await {
                Ok(true) => deleted += 1,
                Ok(false) => {
                    tracing::debug!(room_id = %room_id, "Expired room already gone, skipping");
                }
                Err(e) => {
                    tracing::error!(error = %e, room_id = %room_id, "Room teardown failed, continuing sweep");
                }
            }
        }

        tracing::info!(deleted, "Sweep completed");
        Ok(deleted)
    }
}
