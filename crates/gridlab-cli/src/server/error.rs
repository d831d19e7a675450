//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gridlab::GridlabError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Error from the gridlab library.
    Gridlab(GridlabError),
    /// Failure on the server side, such as a crashed worker task.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
            ApiError::Gridlab(
                e @ (GridlabError::Io { .. }
                | GridlabError::Archive(_)
                | GridlabError::Workbook(_)),
            ) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string()),
            ApiError::Gridlab(e @ GridlabError::UnknownColumn(_)) => {
                (StatusCode::NOT_FOUND, "not_found", e.to_string())
            }
            ApiError::Gridlab(e) => (StatusCode::BAD_REQUEST, "gridlab_error", e.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<GridlabError> for ApiError {
    fn from(err: GridlabError) -> Self {
        ApiError::Gridlab(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Gridlab(e) => write!(f, "Gridlab error: {}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
