use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Not found")]
    NotFound,
    #[error("Room has expired")]
    RoomExpired,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Room code space exhausted")]
    CodeExhausted,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Whether the error is a Postgres unique-constraint violation (SQLSTATE 23505).
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        if let Self::Database(sqlx::Error::Database(db_err)) = self {
            db_err.code().as_deref() == Some("23505")
        } else {
            false
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Self::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            Self::RoomExpired => {
                tracing::debug!("Room has expired");
                (StatusCode::GONE, "Room has expired".to_string())
            }
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            Self::Storage(msg) => {
                tracing::error!(message = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Self::CodeExhausted => {
                tracing::error!("Room code space exhausted after bounded retries");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create room".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
