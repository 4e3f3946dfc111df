//! Sentence-by-sentence morphological annotation.
//!
//! SELECT -> PROMPT -> VALIDATE_ALIGNMENT -> PERSIST, repeated until the
//! selector finds nothing. A sentence is persisted only after every position
//! has been checked, so a rejected answer leaves the whole sentence selectable.

use std::sync::Arc;

use oracle_client::{CompletionBackend, CompletionRequest, StructuredClient};
use tracing::{debug, info, instrument};

use crate::config::AnnotationConfig;
use crate::domains::corpus::{CorpusStore, Word};
use crate::domains::morphology::alignment::verify_alignment;
use crate::domains::morphology::prompts::{sentence_prompt, MORPHOLOGY_SYSTEM_PROMPT};
use crate::domains::morphology::selector::next_sentence;
use crate::domains::morphology::types::{AnnotationStats, MorphologyResponse};
use crate::error::Result;

pub struct AnnotationPipeline {
    store: Arc<dyn CorpusStore>,
    oracle: StructuredClient,
    schema: String,
    config: AnnotationConfig,
}

impl AnnotationPipeline {
    pub fn new(
        store: Arc<dyn CorpusStore>,
        backend: Arc<dyn CompletionBackend>,
        config: AnnotationConfig,
    ) -> Result<Self> {
        let mut oracle = StructuredClient::new(backend);
        let schema = oracle.register::<MorphologyResponse>()?;
        Ok(Self {
            store,
            oracle,
            schema,
            config,
        })
    }

    /// Annotate sentences until none is left. The first failing sentence ends
    /// the pass; sentences completed before it stay persisted.
    pub async fn run_to_exhaustion(&self) -> Result<AnnotationStats> {
        info!(backend = self.oracle.backend_name(), "annotation pass started");
        let mut stats = AnnotationStats::default();

        while let Some(sentence) = next_sentence(self.store.as_ref()).await? {
            stats.words += self.process_sentence(&sentence).await?;
            stats.sentences += 1;
        }

        info!(
            sentences = stats.sentences,
            words = stats.words,
            "annotation pass complete"
        );
        Ok(stats)
    }

    /// Ask the oracle about one sentence and write its answer back.
    /// Returns the number of words written.
    #[instrument(skip_all, fields(sentence = ?sentence.first().map(Word::sentence)))]
    pub async fn process_sentence(&self, sentence: &[Word]) -> Result<usize> {
        let request = CompletionRequest::new(
            MORPHOLOGY_SYSTEM_PROMPT,
            sentence_prompt(sentence),
            self.schema.clone(),
        )
        .temperature(self.config.temperature)
        .max_tokens(self.config.max_tokens);

        let response: MorphologyResponse = self.oracle.complete(&request).await?;
        verify_alignment(sentence, &response.words)?;

        for (word, analysis) in sentence.iter().zip(&response.words) {
            self.store
                .set_annotation(&word.id, &analysis.components, &analysis.translation)
                .await?;
            debug!(word_id = %word.id, translation = %analysis.translation, "annotated word");
        }

        Ok(sentence.len())
    }
}
