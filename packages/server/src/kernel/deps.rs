//! Server dependencies for the pipelines (using traits for testability)
//!
//! This module provides the central dependency container handed to the
//! runner and the HTTP layer. All external services use trait abstractions
//! so tests can swap in mocks.

use oracle_client::CompletionBackend;
use std::sync::Arc;

use crate::config::{AnnotationConfig, RootResolutionConfig};
use crate::domains::corpus::CorpusStore;
use crate::domains::morphology::AnnotationPipeline;
use crate::domains::roots::RootResolver;
use crate::error::Result;
use crate::kernel::BaseLexicon;

/// Server dependencies accessible to handlers and pipeline passes
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn CorpusStore>,
    pub annotation: Arc<AnnotationPipeline>,
    pub roots: Arc<RootResolver>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn CorpusStore>,
        oracle: Arc<dyn CompletionBackend>,
        lexicon: Arc<dyn BaseLexicon>,
        annotation: AnnotationConfig,
        roots: RootResolutionConfig,
    ) -> Result<Self> {
        let annotation = AnnotationPipeline::new(store.clone(), oracle, annotation)?;
        let roots = RootResolver::new(store.clone(), lexicon, roots);

        Ok(Self {
            store,
            annotation: Arc::new(annotation),
            roots: Arc::new(roots),
        })
    }
}
