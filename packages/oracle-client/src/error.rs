//! Error types for the oracle client.

use thiserror::Error;

/// Result type for oracle client operations.
pub type Result<T> = std::result::Result<T, OracleError>;

/// Oracle client errors.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Configuration error (missing API key, unknown provider)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, empty choice list)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (body is not JSON, or JSON does not fit the target type)
    #[error("Parse error: {0}")]
    Parse(String),

    /// The request named a schema that was never registered
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// The completion is JSON but does not satisfy the named schema
    #[error("Schema validation failed for {schema}: {}", errors.join("; "))]
    SchemaValidation { schema: String, errors: Vec<String> },
}

impl OracleError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api(_))
    }
}
