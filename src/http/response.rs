//! Error to response mapping.
//!
//! # Responsibilities
//! - Map table parse errors to 400 Bad Request
//! - Map misses (no route, nothing to delete) to 404 Not Found
//!
//! # Design Decisions
//! - Error bodies are `{"detail": "..."}` so clients see one shape

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::table::TableError;

/// Errors returned by route table handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Input did not parse.
    BadRequest(TableError),
    /// Valid input, but nothing matched.
    NotFound(&'static str),
}

impl From<TableError> for ApiError {
    fn from(e: TableError) -> Self {
        ApiError::BadRequest(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(e) => {
                tracing::warn!(error = %e, "Rejected request");
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = ApiError::from(TableError::InvalidPrefix {
            input: "x".into(),
            reason: "bad",
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError::NotFound("Route not found");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
