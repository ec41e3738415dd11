//! HTTP error mapping
//!
//! Every failure leaves the service as a JSON `{"error": "..."}` body.
//! Internal failures are logged with detail and answered with a generic
//! message; there is no retry on either side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dsm_common::api::ErrorResponse;
use tracing::error;

/// Handler error types for HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// Request body is missing a required field or is not valid JSON
    BadRequest(String),
    /// No authenticated user on the request
    Unauthorized,
    /// Draft does not exist or belongs to someone else
    NotFound,
    /// Storage failure; the string is the user-facing message
    Internal {
        message: &'static str,
        source: dsm_common::Error,
    },
}

pub const DRAFT_NOT_FOUND: &str = "Чернетку не знайдено";

impl ApiError {
    pub fn internal(message: &'static str, source: dsm_common::Error) -> Self {
        ApiError::Internal { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, DRAFT_NOT_FOUND.to_string()),
            ApiError::Internal { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
