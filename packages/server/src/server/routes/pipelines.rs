use axum::{extract::Extension, http::StatusCode};
use tracing::info;

use crate::kernel::PipelineKind;
use crate::server::app::AppState;

/// Start root resolution in the background.
pub async fn trigger_roots_handler(Extension(state): Extension<AppState>) -> (StatusCode, &'static str) {
    info!(pipeline = %PipelineKind::Roots, "pipeline triggered");
    state.runner.trigger(PipelineKind::Roots);
    (StatusCode::ACCEPTED, "Process roots started successfully")
}

/// Start morphological annotation in the background.
pub async fn trigger_morphology_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, &'static str) {
    info!(pipeline = %PipelineKind::Morphology, "pipeline triggered");
    state.runner.trigger(PipelineKind::Morphology);
    (StatusCode::ACCEPTED, "Process parts of speech started successfully")
}
