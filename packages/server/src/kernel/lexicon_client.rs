//! HTTP client for the pealim.com dictionary search.
//!
//! Plain reqwest GET against `<base>/search/?q=<word>`. The site has no API,
//! so requests look like a browser's and the caller is responsible for pacing.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::Duration;
use tracing::debug;

use super::BaseLexicon;
use crate::error::{PipelineError, Result};

pub const DEFAULT_LEXICON_URL: &str = "https://www.pealim.com";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct PealimLexicon {
    client: reqwest::Client,
    base_url: String,
}

impl PealimLexicon {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5,he;q=0.3"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn search_url(&self, word: &str) -> String {
        format!("{}/search/?q={}", self.base_url, urlencoding::encode(word))
    }
}

#[async_trait]
impl BaseLexicon for PealimLexicon {
    async fn search(&self, word: &str) -> Result<String> {
        let url = self.search_url(word);
        debug!(url = %url, "fetching lexicon search page");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Network(format!(
                "lexicon returned HTTP {} for {}",
                status, url
            )));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_hebrew_and_trims_slash() {
        let lexicon = PealimLexicon::new("https://www.pealim.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            lexicon.search_url("אב"),
            "https://www.pealim.com/search/?q=%D7%90%D7%91"
        );
    }
}
