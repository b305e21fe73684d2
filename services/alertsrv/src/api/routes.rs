//! API routes configuration

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::handlers::*;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/alerts", post(create_alert).get(list_alerts))
        .route("/api/redis-test", get(backend_probe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
