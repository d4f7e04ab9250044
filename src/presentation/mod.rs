// Presentation layer - HTTP routes
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{camera_zones, health_check, list_cameras, live_camera};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/cameras", get(list_cameras))
        .route("/cameras/:id/zones", get(camera_zones))
        .route("/cameras/:id/live", get(live_camera))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
