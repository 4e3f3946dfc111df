//! Typed errors for the enrichment pipelines.

use oracle_client::OracleError;
use thiserror::Error;

/// Errors that end a unit of work (a sentence, a word) or a whole pass.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Oracle output did not satisfy the named schema. Not retried.
    #[error("schema validation failed for {schema}: {details}")]
    SchemaValidation { schema: String, details: String },

    /// Oracle token at `position` is not the local token at that position.
    #[error("alignment mismatch at position {position}: expected {expected} but got {actual}")]
    Alignment {
        position: usize,
        expected: String,
        actual: String,
    },

    /// Oracle returned a different number of words than the sentence has.
    #[error("oracle returned {actual} words for a sentence of {expected}")]
    SentenceLength { expected: usize, actual: usize },

    /// Oracle or lexicon could not be reached or answered with a failure status.
    #[error("network error: {0}")]
    Network(String),

    /// Any other oracle failure (configuration, parse, API).
    #[error("oracle error: {0}")]
    Oracle(#[source] OracleError),

    /// Lexicon page could not be interpreted.
    #[error("lexicon error: {0}")]
    Lexicon(String),

    /// Stored words disagree about which sentence they belong to.
    #[error("sentence {sentence} does not contain its unannotated word {seed}")]
    InconsistentSentence { sentence: String, seed: String },

    /// Corpus store operation failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PipelineError {
    pub fn storage(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(error))
    }

    /// Sentence-level failures: the oracle answered, but not usably.
    pub fn is_alignment(&self) -> bool {
        matches!(self, Self::Alignment { .. } | Self::SentenceLength { .. })
    }
}

impl From<OracleError> for PipelineError {
    fn from(error: OracleError) -> Self {
        match error {
            OracleError::SchemaValidation { schema, errors } => Self::SchemaValidation {
                schema,
                details: errors.join("; "),
            },
            OracleError::Network(message) => Self::Network(message),
            other => Self::Oracle(other),
        }
    }
}

impl From<sqlx::Error> for PipelineError {
    fn from(error: sqlx::Error) -> Self {
        Self::storage(error)
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
