use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::common::WordId;
use crate::config::RootResolutionConfig;
use crate::domains::corpus::{CorpusStore, RootLink, Word};
use crate::domains::roots::matcher::{find_root, parse_search_results, SearchKey};
use crate::error::Result;
use crate::kernel::BaseLexicon;

/// Counters for one root resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootStats {
    pub resolved: usize,
    pub not_found: usize,
    /// Words with nothing to search for; they stay unsearched
    pub skipped: usize,
}

/// Links nouns and verbs to their roots, one lexicon lookup per word.
pub struct RootResolver {
    store: Arc<dyn CorpusStore>,
    lexicon: Arc<dyn BaseLexicon>,
    config: RootResolutionConfig,
}

impl RootResolver {
    pub fn new(
        store: Arc<dyn CorpusStore>,
        lexicon: Arc<dyn BaseLexicon>,
        config: RootResolutionConfig,
    ) -> Self {
        Self {
            store,
            lexicon,
            config,
        }
    }

    /// Walk every unsearched candidate in reading order.
    ///
    /// Each lookup is followed by the configured delay, including lookups
    /// that failed. A failed lookup ends the pass and leaves that word
    /// unsearched.
    pub async fn run_to_exhaustion(&self) -> Result<RootStats> {
        info!(delay_ms = self.config.delay.as_millis() as u64, "root resolution pass started");
        let mut stats = RootStats::default();
        let mut cursor: Option<WordId> = None;

        while let Some(word) = self.store.next_root_candidate(cursor.as_ref()).await? {
            cursor = Some(word.id.clone());

            let Some(key) = SearchKey::for_word(&word) else {
                debug!(word_id = %word.id, "no searchable form, skipping");
                stats.skipped += 1;
                continue;
            };

            let outcome = self.resolve(&word, &key).await;
            tokio::time::sleep(self.config.delay).await;

            match outcome? {
                RootLink::Resolved(_) => stats.resolved += 1,
                _ => stats.not_found += 1,
            }
        }

        info!(
            resolved = stats.resolved,
            not_found = stats.not_found,
            skipped = stats.skipped,
            "root resolution pass complete"
        );
        Ok(stats)
    }

    /// Look the word up and record the outcome. Nothing is written unless the
    /// lookup succeeded.
    #[instrument(skip_all, fields(word_id = %word.id, query = %key.query))]
    async fn resolve(&self, word: &Word, key: &SearchKey) -> Result<RootLink> {
        let html = self.lexicon.search(&key.query).await?;
        let entries = parse_search_results(&html, &self.config.selectors)?;

        let link = match find_root(&entries, key) {
            Some(root) => {
                let record = self.store.upsert_root(&root, &word.id).await?;
                info!(root = %root, linked_words = record.word_ids.len(), "resolved root");
                RootLink::Resolved(root)
            }
            None => {
                debug!(entries = entries.len(), "no matching lexicon entry");
                RootLink::NotFound
            }
        };

        self.store.set_root_link(&word.id, &link).await?;
        Ok(link)
    }
}
