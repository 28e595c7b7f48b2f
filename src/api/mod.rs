//! HTTP API module
//!
//! Read endpoints are open; everything under `/admin` needs the admin key.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{state::AppState, store::TimerStore};
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router<S: TimerStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler::<S>))
        .route("/timer", get(timer_handler::<S>))
        .route("/push-cycle", get(push_cycle_handler::<S>))
        .route("/admin/login", post(login_handler::<S>))
        .route("/admin/start", post(start_handler::<S>))
        .route("/admin/stop", post(stop_handler::<S>))
        .route("/admin/reset", post(reset_handler::<S>))
        .route("/admin/custom", post(custom_handler::<S>))
        .route("/admin/push-cycle/reset", post(push_cycle_reset_handler::<S>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
