//! Route table.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sync/:entity", post(handlers::sync_entity))
        .route("/admin/full-sync", post(handlers::full_sync_start))
        .route("/admin/full-sync/status", get(handlers::full_sync_status))
        .route("/admin/resync/:entity/:id", post(handlers::resync_record))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
