//! HTTP error mapping. Per-record sync failures never reach this type;
//! they travel inside the 200 report.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    UnknownEntity { name: String },
    MalformedBody { reason: String },
    JobNotFound { job_id: String },
    Internal { reason: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnknownEntity { name } => (
                StatusCode::NOT_FOUND,
                format!("unknown entity type: {name}"),
            ),
            ApiError::MalformedBody { reason } => (
                StatusCode::BAD_REQUEST,
                format!("malformed request body: {reason}"),
            ),
            ApiError::JobNotFound { job_id } => {
                (StatusCode::NOT_FOUND, format!("job not found: {job_id}"))
            }
            ApiError::Internal { reason } => {
                tracing::error!(reason, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, reason)
            }
        };
        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}
