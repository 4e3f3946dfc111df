//! Completion backends.
//!
//! Every provider speaks the chat-completions dialect with a strict
//! `json_schema` response format; they differ in base URL, credentials and a
//! few headers. `Provider` picks one from configuration.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{OracleError, Result};
use crate::types::{strip_code_blocks, ChatCompletionBody, ChatResponseRaw, CompletionRequest};

/// A structured-output completion provider.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Send `request` constrained by `schema` and return the parsed JSON
    /// answer. Schema conformance is checked by the caller.
    async fn complete_json(&self, request: &CompletionRequest, schema: &Value) -> Result<Value>;
}

/// Shared chat-completions transport.
#[derive(Clone)]
struct ChatCompletions {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
    extra_headers: Vec<(&'static str, String)>,
}

impl ChatCompletions {
    fn new(api_key: String, base_url: &str, model: String, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            extra_headers: Vec::new(),
        })
    }

    async fn post(&self, provider: &str, request: &CompletionRequest, schema: &Value) -> Result<Value> {
        let start = Instant::now();
        let body = ChatCompletionBody::new(&self.model, request, schema.clone());

        let mut builder = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);
        for (name, value) in &self.extra_headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(provider, error = %e, "completion request failed");
            OracleError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(provider, status = %status, error = %error_text, "completion API error");
            return Err(OracleError::Api(format!("{} returned {}: {}", provider, status, error_text)));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OracleError::Api(format!("no completion from {}", provider)))?;

        debug!(
            provider,
            model = %self.model,
            schema = %request.schema_name,
            duration_ms = start.elapsed().as_millis() as u64,
            total_tokens = raw.usage.as_ref().map(|u| u.total_tokens),
            "structured completion"
        );

        serde_json::from_str(strip_code_blocks(&content))
            .map_err(|e| OracleError::Parse(format!("completion is not JSON: {}", e)))
    }
}

/// OpenAI chat completions.
pub struct OpenAIBackend {
    inner: ChatCompletions,
}

impl OpenAIBackend {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: ChatCompletions::new(api_key.into(), Self::DEFAULT_BASE_URL, model.into(), timeout)?,
        })
    }

    /// Point at a proxy or compatible gateway.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.inner.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl CompletionBackend for OpenAIBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete_json(&self, request: &CompletionRequest, schema: &Value) -> Result<Value> {
        self.inner.post(self.name(), request, schema).await
    }
}

/// OpenRouter, which fronts many model vendors behind the same dialect.
pub struct OpenRouterBackend {
    inner: ChatCompletions,
}

impl OpenRouterBackend {
    pub const DEFAULT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";

    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut inner =
            ChatCompletions::new(api_key.into(), Self::DEFAULT_BASE_URL, model.into(), timeout)?;
        inner.extra_headers.push(("X-Title", "corpus-annotator".to_string()));
        Ok(Self { inner })
    }

    /// Attribution header OpenRouter shows in its dashboard.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.inner.extra_headers.push(("HTTP-Referer", referer.into()));
        self
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete_json(&self, request: &CompletionRequest, schema: &Value) -> Result<Value> {
        self.inner.post(self.name(), request, schema).await
    }
}

/// Which backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    OpenRouter,
}

impl Provider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn build(
        &self,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Arc<dyn CompletionBackend>> {
        Ok(match self {
            Self::OpenAI => Arc::new(OpenAIBackend::new(api_key, model, timeout)?),
            Self::OpenRouter => Arc::new(OpenRouterBackend::new(api_key, model, timeout)?),
        })
    }
}

impl FromStr for Provider {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(OracleError::Config(format!("unknown oracle provider: {}", other))),
        }
    }
}
