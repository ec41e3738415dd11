//! Calling user
//!
//! Login is handled in front of this service; the proxy forwards the
//! authenticated user id in `X-User-Id`. Draft routes refuse requests
//! without it.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use dsm_common::api::USER_ID_HEADER;

use super::error::ApiError;

/// Authenticated user id taken from the request headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| UserId(v.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}
