use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::kernel::{JobState, PipelineKind};
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: DatabaseHealth,
    pipelines: Vec<PipelineHealth>,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct PipelineHealth {
    pipeline: String,
    running: bool,
    pending: u32,
}

impl From<JobState> for PipelineHealth {
    fn from(state: JobState) -> Self {
        Self {
            pipeline: state.pipeline.to_string(),
            running: state.is_running(),
            pending: state.pending,
        }
    }
}

/// Health check endpoint
///
/// Returns 200 OK when the corpus store answers a ping within 5 seconds,
/// 503 Service Unavailable otherwise. Pipeline states are informational.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = state.runner.deps().store.clone();
    let database = match tokio::time::timeout(std::time::Duration::from_secs(5), store.ping()).await
    {
        Ok(Ok(())) => DatabaseHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(Err(e)) => DatabaseHealth {
            status: "error".to_string(),
            error: Some(format!("Ping failed: {}", e)),
        },
        Err(_) => DatabaseHealth {
            status: "error".to_string(),
            error: Some("Ping timeout (>5s)".to_string()),
        },
    };

    let flight = state.runner.flight();
    let pipelines = [PipelineKind::Morphology, PipelineKind::Roots]
        .into_iter()
        .map(|kind| PipelineHealth::from(flight.state(kind)))
        .collect();

    let is_healthy = database.status == "ok";
    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            database,
            pipelines,
        }),
    )
}
