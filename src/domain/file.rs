use time::OffsetDateTime;
use uuid::Uuid;

/// Metadata for a file shared into a room.
///
/// `file_name` is the client-supplied name, kept verbatim for display only.
/// `file_path` is the server-generated object-storage key. A file never
/// outlives its room: teardown removes the stored bytes and this record
/// together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: Uuid,
    pub room_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub uploaded_at: OffsetDateTime,
}
