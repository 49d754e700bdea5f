use crate::domain::Room;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomRecord {
    pub id: Uuid,
    pub room_code: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl From<RoomRecord> for Room {
    fn from(record: RoomRecord) -> Self {
        Self {
            id: record.id,
            code: record.room_code,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}
