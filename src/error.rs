//! Error taxonomy for the procurement engine, realizing the categories
//! the core distinguishes (see spec §7): callers get a stable error kind,
//! internals keep using `anyhow::Result` with `.context(...)`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("external feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("failed to parse record: {0}")]
    ParseError(String),

    #[error("storage error: {0}")]
    StorageError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::FeedUnavailable(_) => (StatusCode::BAD_GATEWAY, "feed_unavailable"),
            AppError::ParseError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "parse_error"),
            AppError::StorageError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": kind,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
