//! Test harness wiring the pipelines to in-memory collaborators.
//!
//! No database or network: the corpus lives in a `MemoryCorpusStore`, the
//! oracle is a scripted `MockBackend` and the lexicon a scripted
//! `MockLexicon`. The mocks stay reachable through `deps` so tests can queue
//! responses and inspect calls after the harness is built.

use annotator_core::domains::corpus::{MemoryCorpusStore, Word};
use annotator_core::kernel::{MockLexicon, PipelineRunner, TestDependencies};
use oracle_client::testing::MockBackend;
use std::time::Duration;

pub struct TestHarness {
    pub deps: TestDependencies,
    pub runner: PipelineRunner,
}

impl TestHarness {
    pub fn new(deps: TestDependencies) -> Self {
        // Initialize tracing subscriber to respect RUST_LOG environment variable.
        // Uses try_init() to avoid panicking if already initialized.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let runner = PipelineRunner::new(deps.to_server_deps().expect("Failed to build server deps"));
        Self { deps, runner }
    }

    /// Harness over `words` with the given oracle and lexicon scripts.
    pub fn with(words: Vec<Word>, oracle: MockBackend, lexicon: MockLexicon) -> Self {
        Self::new(
            TestDependencies::new()
                .mock_store(MemoryCorpusStore::with_words(words))
                .mock_oracle(oracle)
                .mock_lexicon(lexicon),
        )
    }

    pub fn store(&self) -> &MemoryCorpusStore {
        &self.deps.store
    }

    pub fn oracle(&self) -> &MockBackend {
        &self.deps.oracle
    }

    pub fn lexicon(&self) -> &MockLexicon {
        &self.deps.lexicon
    }

    /// Delay the root resolver waits after each lookup.
    pub fn lexicon_delay(&self) -> Duration {
        self.deps.roots.delay
    }
}
