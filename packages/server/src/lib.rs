// Hebrew Corpus Annotator - Core
//
// This crate enriches a verse-addressed Hebrew corpus with morphology,
// translations and shared roots. Two pipelines do the work: one asks a
// structured-output language model about each sentence, the other looks
// nouns and verbs up on a lexicon site. Both run behind a single-flight
// coordinator and are triggered over HTTP.

pub mod common;
pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;
pub mod server;

pub use config::*;
pub use error::{PipelineError, Result};
