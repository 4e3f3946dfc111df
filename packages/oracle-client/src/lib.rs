//! Provider-agnostic structured-output client.
//!
//! The oracle is a text-completion provider that answers with JSON conforming
//! to a named schema. This crate owns:
//!
//! - [`CompletionBackend`] and its OpenAI / OpenRouter implementations
//! - [`SchemaRegistry`] for schema generation and local validation
//! - [`StructuredClient`], which ties the two together
//! - [`testing::MockBackend`] for tests that must not touch the network
//!
//! ```rust,ignore
//! use oracle_client::{CompletionRequest, Provider, StructuredClient};
//!
//! let backend = Provider::OpenAI.build(api_key, "gpt-4o", timeout)?;
//! let mut client = StructuredClient::new(backend);
//! let schema = client.register::<MorphologyResponse>()?;
//!
//! let parsed: MorphologyResponse = client
//!     .complete(&CompletionRequest::new(system, sentence, schema))
//!     .await?;
//! ```

pub mod backend;
pub mod error;
pub mod schema;
pub mod testing;
pub mod types;

pub use backend::{CompletionBackend, OpenAIBackend, OpenRouterBackend, Provider};
pub use error::{OracleError, Result};
pub use schema::{SchemaRegistry, StructuredOutput};
pub use types::{CompletionRequest, Message, Usage};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Backend plus the schemas its answers are held to.
pub struct StructuredClient {
    backend: Arc<dyn CompletionBackend>,
    schemas: SchemaRegistry,
}

impl StructuredClient {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            schemas: SchemaRegistry::new(),
        }
    }

    /// Register `T`'s schema; returns the name to put in requests.
    pub fn register<T: StructuredOutput>(&mut self) -> Result<String> {
        self.schemas.register::<T>()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Call the backend and return the raw JSON once it passes validation.
    pub async fn complete_value(&self, request: &CompletionRequest) -> Result<Value> {
        let schema = self.schemas.get(&request.schema_name)?;
        let value = self.backend.complete_json(request, schema).await?;

        if let Err(e) = self.schemas.validate(&request.schema_name, &value) {
            warn!(
                backend = self.backend.name(),
                schema = %request.schema_name,
                error = %e,
                "oracle response rejected by schema"
            );
            return Err(e);
        }
        Ok(value)
    }

    /// Call the backend, validate, and deserialize into `T`.
    pub async fn complete<T: DeserializeOwned>(&self, request: &CompletionRequest) -> Result<T> {
        let value = self.complete_value(request).await?;
        serde_json::from_value(value).map_err(|e| OracleError::Parse(e.to_string()))
    }
}
