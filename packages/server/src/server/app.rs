//! Application setup and server configuration.

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::PipelineRunner;
use crate::server::routes::{health_handler, trigger_morphology_handler, trigger_roots_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub runner: PipelineRunner,
}

/// Build the Axum application router
pub fn build_app(runner: PipelineRunner) -> Router {
    let app_state = AppState { runner };

    Router::new()
        // Pipeline triggers (fire and forget)
        .route("/pipelines/roots", post(trigger_roots_handler))
        .route("/pipelines/morphology", post(trigger_morphology_handler))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
