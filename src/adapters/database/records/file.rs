use crate::domain::StoredFile;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub room_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub uploaded_at: OffsetDateTime,
}

impl From<FileRecord> for StoredFile {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            room_id: record.room_id,
            file_name: record.file_name,
            file_path: record.file_path,
            uploaded_at: record.uploaded_at,
        }
    }
}
