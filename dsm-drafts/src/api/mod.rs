//! HTTP API for dsm-drafts

pub mod drafts;
pub mod error;
pub mod health;
pub mod user;

pub use drafts::{delete_draft, get_draft, list_drafts, save_draft, update_draft};
pub use error::ApiError;
pub use health::health_routes;
pub use user::UserId;
