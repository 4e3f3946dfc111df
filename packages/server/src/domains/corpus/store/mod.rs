//! Corpus store abstraction.
//!
//! The store owns all persisted state. Every mutation is a single-document
//! atomic update; there are no multi-word transactions, so consistency across
//! the words of a sentence is best-effort.

mod memory;
mod postgres;

pub use memory::MemoryCorpusStore;
pub use postgres::PostgresCorpusStore;

use async_trait::async_trait;

use crate::common::{SentenceRef, WordId};
use crate::domains::corpus::models::{Components, Root, RootLink, Word};
use crate::error::Result;

#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Point lookup.
    async fn get_word(&self, id: &WordId) -> Result<Option<Word>>;

    /// Add a word record. Replaces an existing record with the same identity.
    async fn insert_word(&self, word: &Word) -> Result<()>;

    /// Any word whose `components` or `translation` is absent.
    async fn find_unannotated_word(&self) -> Result<Option<Word>>;

    /// All words of a sentence in ascending word position.
    async fn find_sentence(&self, sentence: SentenceRef) -> Result<Vec<Word>>;

    /// Set `components` and `translation` on one word.
    async fn set_annotation(
        &self,
        id: &WordId,
        components: &Components,
        translation: &str,
    ) -> Result<()>;

    /// First unsearched noun/verb with identity strictly after `after`,
    /// in identity order.
    async fn next_root_candidate(&self, after: Option<&WordId>) -> Result<Option<Word>>;

    /// Create the root if missing and add `word_id` to its set of words.
    async fn upsert_root(&self, root: &str, word_id: &WordId) -> Result<Root>;

    /// Record the outcome of root resolution on one word.
    async fn set_root_link(&self, id: &WordId, link: &RootLink) -> Result<()>;

    async fn get_root(&self, root: &str) -> Result<Option<Root>>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<()>;
}
