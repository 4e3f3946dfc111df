use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domains::morphology::AnnotationStats;
use crate::domains::roots::RootStats;
use crate::error::Result;
use crate::kernel::single_flight::{Enqueued, PipelineKind, SingleFlight};
use crate::kernel::ServerDeps;

/// Result of one completed pass, logged by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReport {
    Morphology(AnnotationStats),
    Roots(RootStats),
}

/// Starts pipeline passes through the single-flight coordinator.
///
/// Cheap to clone; clones share the coordinator state.
#[derive(Clone)]
pub struct PipelineRunner {
    deps: ServerDeps,
    flight: Arc<SingleFlight>,
}

impl PipelineRunner {
    pub fn new(deps: ServerDeps) -> Self {
        Self {
            deps,
            flight: Arc::new(SingleFlight::new()),
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }

    pub fn flight(&self) -> &SingleFlight {
        &self.flight
    }

    /// Fire and forget: returns as soon as the request is handed to the runtime.
    pub fn trigger(&self, pipeline: PipelineKind) -> JoinHandle<Enqueued> {
        let runner = self.clone();
        tokio::spawn(async move { runner.run(pipeline).await })
    }

    /// Enqueue and, when this call becomes the runner, wait for every owed pass.
    pub async fn run(&self, pipeline: PipelineKind) -> Enqueued {
        self.flight
            .enqueue(pipeline, || self.run_pass(pipeline))
            .await
    }

    /// One pass to exhaustion, bypassing the coordinator.
    pub async fn run_pass(&self, pipeline: PipelineKind) -> Result<PassReport> {
        match pipeline {
            PipelineKind::Morphology => self
                .deps
                .annotation
                .run_to_exhaustion()
                .await
                .map(PassReport::Morphology),
            PipelineKind::Roots => self
                .deps
                .roots
                .run_to_exhaustion()
                .await
                .map(PassReport::Roots),
        }
    }
}
