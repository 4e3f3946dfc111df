//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod lexicon_client;
pub mod runner;
pub mod single_flight;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use lexicon_client::{PealimLexicon, DEFAULT_LEXICON_URL};
pub use runner::{PassReport, PipelineRunner};
pub use single_flight::{Enqueued, JobState, PipelineKind, SingleFlight, MAX_PENDING};
pub use test_dependencies::{search_results_page, MockLexicon, TestDependencies};
pub use traits::*;
