// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use async_trait::async_trait;
use oracle_client::testing::MockBackend;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{BaseLexicon, ServerDeps};
use crate::config::{AnnotationConfig, RootResolutionConfig};
use crate::domains::corpus::MemoryCorpusStore;
use crate::error::{PipelineError, Result};

// =============================================================================
// Mock Lexicon
// =============================================================================

const EMPTY_RESULTS_PAGE: &str = "<html><body><div class=\"results\"></div></body></html>";

pub struct MockLexicon {
    responses: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockLexicon {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a search-results page
    pub fn with_page(self, html: impl Into<String>) -> Self {
        self.push_page(html);
        self
    }

    /// Queue a network failure
    pub fn with_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Queue a page on a shared mock
    pub fn push_page(&self, html: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(html.into()));
    }

    /// Get all words that were searched
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a word was searched
    pub fn was_searched(&self, word: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|w| w == word)
    }
}

impl Default for MockLexicon {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseLexicon for MockLexicon {
    async fn search(&self, word: &str) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(word.to_string());

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(html)) => Ok(html),
            Some(Err(message)) => Err(PipelineError::Network(message)),
            None => Ok(EMPTY_RESULTS_PAGE.to_string()),
        }
    }
}

/// Render a search-results page in the lexicon's markup.
///
/// Each entry is a list of vocalized forms and the displayed root.
pub fn search_results_page(entries: &[(&[&str], &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(forms, root)| {
            let forms: String = forms
                .iter()
                .map(|form| format!("<span class=\"menukad\">{}</span>", form))
                .collect();
            format!(
                "<div class=\"verb-search-result\">\
                 <div class=\"verb-search-lemma\">{}</div>\
                 <div class=\"verb-search-root\">Root: <span>{}</span></div>\
                 </div>",
                forms, root
            )
        })
        .collect();
    format!("<html><body><div class=\"results\">{}</div></body></html>", body)
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mocks for every external collaborator, sharable with the test body
pub struct TestDependencies {
    pub store: Arc<MemoryCorpusStore>,
    pub oracle: Arc<MockBackend>,
    pub lexicon: Arc<MockLexicon>,
    pub annotation: AnnotationConfig,
    pub roots: RootResolutionConfig,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryCorpusStore::new()),
            oracle: Arc::new(MockBackend::new()),
            lexicon: Arc::new(MockLexicon::new()),
            annotation: AnnotationConfig::default(),
            roots: RootResolutionConfig::default(),
        }
    }

    /// Set a seeded store
    pub fn mock_store(mut self, store: MemoryCorpusStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Set a mock oracle backend
    pub fn mock_oracle(mut self, oracle: MockBackend) -> Self {
        self.oracle = Arc::new(oracle);
        self
    }

    /// Set a mock lexicon
    pub fn mock_lexicon(mut self, lexicon: MockLexicon) -> Self {
        self.lexicon = Arc::new(lexicon);
        self
    }

    /// Convert into ServerDeps for testing
    pub fn to_server_deps(&self) -> Result<ServerDeps> {
        ServerDeps::new(
            self.store.clone(),
            self.oracle.clone(),
            self.lexicon.clone(),
            self.annotation.clone(),
            self.roots.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
