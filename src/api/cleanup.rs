use crate::api::AppState;
use crate::api::schemas::rooms::SweepResponse;
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};
use time::OffsetDateTime;

/// Runs one expiry sweep and reports how many rooms were reaped. Intended
/// for an external scheduler; idempotent, so overlapping triggers are safe.
///
/// # Errors
/// Returns `AppError::Database` if the expired-room query fails.
pub async fn run_cleanup(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let deleted = state.sweep_service.sweep(OffsetDateTime::now_utc()).await?;
    Ok(Json(SweepResponse { deleted }))
}
