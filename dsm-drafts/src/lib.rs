//! dsm-drafts library - draft storage service
//!
//! Stores in-progress method pages per user so they can be resumed later.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Draft database pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Draft routes require the `X-User-Id` header; `/health` does not.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let drafts = Router::new()
        .route(
            "/drafts/api",
            get(api::list_drafts).post(api::save_draft),
        )
        .route(
            "/drafts/api/:id",
            get(api::get_draft)
                .put(api::update_draft)
                .delete(api::delete_draft),
        );

    Router::new()
        .merge(drafts)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
