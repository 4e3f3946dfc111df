use anyhow::{Context, Result};
use dotenvy::dotenv;
use oracle_client::Provider;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domains::roots::LexiconSelectors;
use crate::kernel::DEFAULT_LEXICON_URL;

/// Oracle sampling settings for the annotation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 2000,
        }
    }
}

/// Pacing and page layout for the root resolution pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RootResolutionConfig {
    /// Pause after every lexicon lookup
    pub delay: Duration,
    pub selectors: LexiconSelectors,
}

impl Default for RootResolutionConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(10_000),
            selectors: LexiconSelectors::default(),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub oracle_provider: Provider,
    pub oracle_api_key: String,
    pub oracle_model: String,
    pub oracle_timeout: Duration,
    pub lexicon_base_url: String,
    pub lexicon_timeout: Duration,
    pub annotation: AnnotationConfig,
    pub roots: RootResolutionConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let oracle_provider: Provider = env::var("ORACLE_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .parse()
            .context("ORACLE_PROVIDER must be openai or openrouter")?;
        let key_var = oracle_provider.api_key_var();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080).context("PORT must be a valid number")?,
            oracle_api_key: env::var(key_var)
                .with_context(|| format!("{} must be set", key_var))?,
            oracle_provider,
            oracle_model: env::var("ORACLE_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            oracle_timeout: Duration::from_secs(
                parse_var("ORACLE_TIMEOUT_SECS", 120)
                    .context("ORACLE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            lexicon_base_url: env::var("LEXICON_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LEXICON_URL.to_string()),
            lexicon_timeout: Duration::from_secs(
                parse_var("LEXICON_TIMEOUT_SECS", 30)
                    .context("LEXICON_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            annotation: AnnotationConfig {
                temperature: parse_var("ORACLE_TEMPERATURE", 0.5)
                    .context("ORACLE_TEMPERATURE must be a number")?,
                max_tokens: parse_var("ORACLE_MAX_TOKENS", 2000)
                    .context("ORACLE_MAX_TOKENS must be a valid number")?,
            },
            roots: RootResolutionConfig {
                delay: Duration::from_millis(
                    parse_var("LEXICON_DELAY_MS", 10_000)
                        .context("LEXICON_DELAY_MS must be a whole number of milliseconds")?,
                ),
                selectors: LexiconSelectors::default(),
            },
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value {:?} for {}", raw, name)),
        Err(_) => Ok(default),
    }
}
