use crate::domain::Room;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: Uuid,
    pub room_code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self { id: room.id, room_code: room.code, created_at: room.created_at, expires_at: room.expires_at }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteRoomResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub deleted: u64,
}
