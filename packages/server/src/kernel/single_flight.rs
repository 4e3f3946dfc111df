//! Single-flight coordination of pipeline passes.
//!
//! Each pipeline kind has a `JobState` whose `pending` counter is zero at
//! process start. A trigger increments it; the trigger that finds it at zero
//! becomes the runner and keeps running passes, decrementing after each, until
//! it drops back to zero. `pending` never exceeds [`MAX_PENDING`] (the running
//! pass plus one queued rerun), so any number of triggers that land during a
//! pass coalesce into a single extra pass.

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, error, info, warn};

pub const MAX_PENDING: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Morphology,
    Roots,
}

impl PipelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morphology => "morphology",
            Self::Roots => "roots",
        }
    }
}

impl Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobState {
    pub pipeline: PipelineKind,
    pub pending: u32,
}

impl JobState {
    fn idle(pipeline: PipelineKind) -> Self {
        Self {
            pipeline,
            pending: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending > 0
    }
}

/// What happened to an `enqueue` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// This caller ran the passes itself.
    Ran { passes: usize },
    /// A pass was already running; this trigger was folded into its rerun.
    Coalesced,
}

#[derive(Default)]
pub struct SingleFlight {
    // Never held across an await
    jobs: Mutex<HashMap<PipelineKind, JobState>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, pipeline: PipelineKind) -> JobState {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pipeline)
            .copied()
            .unwrap_or_else(|| JobState::idle(pipeline))
    }

    /// Count a trigger. True when the caller should become the runner.
    fn arrive(&self, pipeline: PipelineKind) -> bool {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let job = jobs
            .entry(pipeline)
            .or_insert_with(|| JobState::idle(pipeline));
        let was_idle = job.pending == 0;
        job.pending = (job.pending + 1).min(MAX_PENDING);
        was_idle
    }

    /// Count a finished pass. True when another pass is owed.
    fn finish_pass(&self, pipeline: PipelineKind) -> bool {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let job = jobs
            .entry(pipeline)
            .or_insert_with(|| JobState::idle(pipeline));
        job.pending = job.pending.saturating_sub(1);
        job.pending > 0
    }

    /// Run `pass` unless one is already running for `pipeline`.
    ///
    /// Errors from a pass are logged and swallowed; the next owed pass still
    /// runs.
    pub async fn enqueue<F, Fut, T, E>(&self, pipeline: PipelineKind, mut pass: F) -> Enqueued
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: Debug,
        E: Display,
    {
        if !self.arrive(pipeline) {
            debug!(%pipeline, "pass in progress, trigger coalesced");
            return Enqueued::Coalesced;
        }

        let mut guard = RunnerGuard {
            flight: self,
            pipeline,
            armed: true,
        };

        let mut passes = 0;
        loop {
            passes += 1;
            match pass().await {
                Ok(stats) => info!(%pipeline, pass = passes, ?stats, "pipeline pass finished"),
                Err(e) => error!(%pipeline, pass = passes, error = %e, "pipeline pass failed"),
            }
            if !self.finish_pass(pipeline) {
                break;
            }
        }

        guard.armed = false;
        Enqueued::Ran { passes }
    }

    /// Forget owed passes after the runner died mid-pass.
    fn abandon(&self, pipeline: PipelineKind) {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(job) = jobs.get_mut(&pipeline) {
            job.pending = 0;
        }
    }
}

/// Releases the pipeline if the runner unwinds or is dropped mid-pass, so the
/// next trigger can become the runner.
struct RunnerGuard<'a> {
    flight: &'a SingleFlight,
    pipeline: PipelineKind,
    armed: bool,
}

impl Drop for RunnerGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(pipeline = %self.pipeline, "pipeline runner stopped mid-pass, releasing");
            self.flight.abandon(self.pipeline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_idle_trigger_runs_one_pass() {
        let flight = SingleFlight::new();
        let outcome = flight
            .enqueue(PipelineKind::Roots, || async { Ok::<_, String>(()) })
            .await;

        assert_eq!(outcome, Enqueued::Ran { passes: 1 });
        assert_eq!(flight.state(PipelineKind::Roots).pending, 0);
    }

    #[tokio::test]
    async fn test_triggers_during_pass_coalesce_into_one_rerun() {
        let flight = &SingleFlight::new();
        let runs = &AtomicUsize::new(0);

        let outcome = flight
            .enqueue(PipelineKind::Roots, || async move {
                if runs.fetch_add(1, Ordering::SeqCst) == 0 {
                    for _ in 0..3 {
                        let nested = flight
                            .enqueue(PipelineKind::Roots, || async { Ok::<_, String>(()) })
                            .await;
                        assert_eq!(nested, Enqueued::Coalesced);
                    }
                    assert_eq!(flight.state(PipelineKind::Roots).pending, MAX_PENDING);
                }
                Ok::<_, String>(())
            })
            .await;

        assert_eq!(outcome, Enqueued::Ran { passes: 2 });
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert!(!flight.state(PipelineKind::Roots).is_running());
    }

    #[tokio::test]
    async fn test_failed_pass_still_runs_owed_rerun() {
        let flight = &SingleFlight::new();
        let runs = &AtomicUsize::new(0);

        let outcome = flight
            .enqueue(PipelineKind::Morphology, || async move {
                if runs.fetch_add(1, Ordering::SeqCst) == 0 {
                    flight
                        .enqueue(PipelineKind::Morphology, || async { Ok::<_, String>(()) })
                        .await;
                    return Err("oracle unavailable".to_string());
                }
                Ok(())
            })
            .await;

        assert_eq!(outcome, Enqueued::Ran { passes: 2 });
        assert_eq!(flight.state(PipelineKind::Morphology).pending, 0);
    }

    async fn exploding_pass() -> Result<(), String> {
        panic!("pass blew up")
    }

    #[tokio::test]
    async fn test_panicking_pass_releases_pipeline() {
        let flight = Arc::new(SingleFlight::new());

        let runner = {
            let flight = flight.clone();
            tokio::spawn(async move {
                flight.enqueue(PipelineKind::Roots, exploding_pass).await
            })
        };
        assert!(runner.await.unwrap_err().is_panic());

        assert!(!flight.state(PipelineKind::Roots).is_running());
        let outcome = flight
            .enqueue(PipelineKind::Roots, || async { Ok::<_, String>(()) })
            .await;
        assert_eq!(outcome, Enqueued::Ran { passes: 1 });
    }

    #[tokio::test]
    async fn test_cancelled_runner_releases_pipeline() {
        let flight = SingleFlight::new();

        let stalled = flight.enqueue(PipelineKind::Morphology, || async {
            std::future::pending::<Result<(), String>>().await
        });
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(10), stalled).await;
        assert!(timed_out.is_err());

        assert_eq!(flight.state(PipelineKind::Morphology).pending, 0);
    }

    #[tokio::test]
    async fn test_pipelines_are_independent() {
        let flight = &SingleFlight::new();

        let outcome = flight
            .enqueue(PipelineKind::Morphology, || async move {
                let inner = flight
                    .enqueue(PipelineKind::Roots, || async { Ok::<_, String>(()) })
                    .await;
                assert_eq!(inner, Enqueued::Ran { passes: 1 });
                Ok::<_, String>(())
            })
            .await;

        assert_eq!(outcome, Enqueued::Ran { passes: 1 });
    }
}
