//! Shared HTTP API types
//!
//! Framework-free: no axum or reqwest types appear here. The service
//! wraps them in handlers, the session wraps them in a client.

pub mod types;

pub use types::{
    DraftDetail, DraftListResponse, DraftSummary, ErrorResponse, MessageResponse,
    SaveDraftRequest, SaveDraftResponse, UpdateDraftRequest,
};

/// Header carrying the authenticated user id, set by the fronting proxy
pub const USER_ID_HEADER: &str = "x-user-id";
