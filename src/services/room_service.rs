use crate::adapters::database::DbPool;
use crate::adapters::database::room_repo::RoomRepository;
use crate::config::RoomConfig;
use crate::domain::Room;
use crate::error::{AppError, Result};
use crate::services::file_service::FileService;
use rand::Rng;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Alphabet for room codes: uppercase letters and digits.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a room code.
pub const CODE_LENGTH: usize = 6;

/// How many candidate codes to try before giving up. The unique constraint
/// on `rooms.room_code` is what actually enforces uniqueness; this bound
/// only caps the latency of the optimistic retry loop.
const CODE_MAX_ATTEMPTS: u32 = 10;

#[derive(Clone, Debug)]
pub struct RoomService {
    pool: DbPool,
    repo: RoomRepository,
    files: FileService,
    config: RoomConfig,
}

impl RoomService {
    #[must_use]
    pub const fn new(pool: DbPool, repo: RoomRepository, files: FileService, config: RoomConfig) -> Self {
        Self { pool, repo, files, config }
    }

    /// Creates a room with a fresh code and `expires_at = now + ttl`.
    ///
    /// # Errors
    /// Returns `AppError::CodeExhausted` if every candidate code collided,
    /// or `AppError::Database` on persistence failure.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn create_room(&self) -> Result<Room> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + Duration::minutes(self.config.ttl_minutes);

        for attempt in 0..CODE_MAX_ATTEMPTS {
            let code = generate_room_code();
            let mut conn = self.pool.acquire().await?;
            match self.repo.create(&mut conn, Uuid::new_v4(), &code, now, expires_at).await {
                Ok(room) => {
                    tracing::debug!(room_id = %room.id, code = %room.code, expires_at = %room.expires_at, "Room created");
                    return Ok(room);
                }
                Err(e) if e.is_unique_violation() => {
                    tracing::debug!(attempt, code = %code, "Room code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::CodeExhausted)
    }

    /// Looks up a room by code, case-insensitively. Expired rooms are
    /// returned as-is: callers apply the expiry policy for their path.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` for a malformed code, or
    /// `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "debug"), skip(self))]
    pub async fn get_room(&self, code: &str) -> Result<Option<Room>> {
        let code = normalize_code(code)?;
        let mut conn = self.pool.acquire().await?;
        self.repo.find_by_code(&mut conn, &code).await
    }

    /// Tears down a room: backing objects and file rows first, the room row
    /// last, so an interrupted teardown is retried by a later sweep rather
    /// than leaving invisible orphaned objects. Returns whether the room row
    /// was actually removed; deleting an already-absent room is a no-op.
    ///
    /// An upload racing this teardown can insert a file row after the path
    /// snapshot was taken. The FK cascade removes that row with the room,
    /// and the object it pointed at is stranded in the bucket. Teardown does
    /// not lock the room; stranded objects are left to bucket lifecycle
    /// rules, not reclaimed by this service.
    ///
    /// # Errors
    /// Returns `AppError::Database` if a row operation fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete_room_by_id(&self, room_id: Uuid) -> Result<bool> {
        self.files.delete_for_room(room_id).await?;

        let mut conn = self.pool.acquire().await?;
        let deleted = self.repo.delete(&mut conn, room_id).await?;
        if deleted {
            tracing::info!(room_id = %room_id, "Room deleted");
        }
        Ok(deleted)
    }
}

fn generate_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH).map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())])).collect()
}

fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
        Ok(code)
    } else {
        Err(AppError::BadRequest("Invalid room code".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..100 {
            let code = generate_room_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()), "bad code: {code}");
        }
    }

    #[test]
    fn test_normalize_uppercases() {
        assert_eq!(normalize_code("ab12cd").expect("valid code"), "AB12CD");
        assert_eq!(normalize_code(" AB12CD ").expect("valid code"), "AB12CD");
    }

    #[test]
    fn test_normalize_rejects_malformed() {
        assert!(normalize_code("").is_err());
        assert!(normalize_code("ABC").is_err());
        assert!(normalize_code("ABC1234").is_err());
        assert!(normalize_code("AB-12D").is_err());
    }
}
