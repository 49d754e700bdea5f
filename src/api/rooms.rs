use crate::api::AppState;
use crate::api::schemas::rooms::{DeleteRoomResponse, RoomResponse};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use time::OffsetDateTime;

/// Creates a new room with a fresh code.
///
/// # Errors
/// Returns `AppError::CodeExhausted` or `AppError::Database` on failure.
pub async fn create_room(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let room = state.room_service.create_room().await?;
    Ok((StatusCode::CREATED, Json(RoomResponse::from(room))))
}

/// Fetches room details by code.
///
/// # Errors
/// Returns `AppError::NotFound` if no room matches, `AppError::RoomExpired`
/// once the room is past its expiry, even if it has not been swept yet.
pub async fn get_room(State(state): State<AppState>, Path(code): Path<String>) -> Result<impl IntoResponse> {
    let room = state.room_service.get_room(&code).await?.ok_or(AppError::NotFound)?;

    if room.is_expired_at(OffsetDateTime::now_utc()) {
        return Err(AppError::RoomExpired);
    }

    Ok(Json(RoomResponse::from(room)))
}

/// Ends a room session, tearing down its files and the room itself.
///
/// # Errors
/// Returns `AppError::NotFound` if no room matches the code.
pub async fn delete_room(State(state): State<AppState>, Path(code): Path<String>) -> Result<impl IntoResponse> {
    let room = state.room_service.get_room(&code).await?.ok_or(AppError::NotFound)?;

    state.room_service.delete_room_by_id(room.id).await?;

    Ok(Json(DeleteRoomResponse { success: true }))
}
