use crate::services::file_service::FileWithUrl;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: Uuid,
    pub room_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    pub signed_url: Option<String>,
}

impl From<FileWithUrl> for FileResponse {
    fn from(entry: FileWithUrl) -> Self {
        Self {
            id: entry.file.id,
            room_id: entry.file.room_id,
            file_name: entry.file.file_name,
            file_path: entry.file.file_path,
            uploaded_at: entry.file.uploaded_at,
            signed_url: entry.signed_url,
        }
    }
}
