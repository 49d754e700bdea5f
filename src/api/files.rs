use crate::api::AppState;
use crate::api::schemas::files::FileResponse;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::Bytes;

/// Lists a room's files, newest first, each with a freshly signed URL.
/// Polling clients re-call this; every response carries fresh links.
///
/// # Errors
/// Returns `AppError::NotFound` if no room matches the code.
pub async fn list_files(State(state): State<AppState>, Path(code): Path<String>) -> Result<impl IntoResponse> {
    let room = state.room_service.get_room(&code).await?.ok_or(AppError::NotFound)?;

    let files = state.file_service.list_files(room.id).await?;
    let body: Vec<FileResponse> = files.into_iter().map(Into::into).collect();

    Ok(Json(body))
}

/// Uploads a file to a room via a multipart form with a `file` field.
///
/// # Errors
/// Returns `AppError::NotFound` for an unknown room, `AppError::RoomExpired`
/// for an expired one, and `AppError::BadRequest` for a missing field,
/// disallowed type, or oversized body.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(code): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let room = state.room_service.get_room(&code).await?.ok_or(AppError::NotFound)?;

    let mut upload: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let data = field.bytes().await.map_err(|e| AppError::BadRequest(format!("Failed to read file data: {e}")))?;

        upload = Some((file_name, content_type, data));
    }

    let (file_name, content_type, data) = upload.ok_or_else(|| AppError::BadRequest("No file provided".into()))?;

    let file = state.file_service.upload(&room, &file_name, &content_type, data).await?;

    Ok((StatusCode::CREATED, Json(FileResponse::from(file))))
}
