//! In-memory corpus store for tests and local development.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{PoisonError, RwLock};

use crate::common::{SentenceRef, WordId};
use crate::domains::corpus::models::{Components, Root, RootLink, Word};
use crate::domains::corpus::store::CorpusStore;
use crate::error::Result;

/// Words ordered by identity, roots keyed by letters.
///
/// "Find one" returns the lowest matching identity, which keeps selection
/// deterministic.
#[derive(Default)]
pub struct MemoryCorpusStore {
    words: RwLock<BTreeMap<WordId, Word>>,
    roots: RwLock<HashMap<String, Root>>,
}

impl MemoryCorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with words.
    pub fn with_words(words: impl IntoIterator<Item = Word>) -> Self {
        let store = Self::new();
        {
            let mut map = store.words.write().unwrap_or_else(PoisonError::into_inner);
            for word in words {
                map.insert(word.id.clone(), word);
            }
        }
        store
    }

    pub fn word_count(&self) -> usize {
        self.words.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn root_count(&self) -> usize {
        self.roots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Copy of every word in identity order.
    pub fn words(&self) -> Vec<Word> {
        self.words.read().unwrap_or_else(PoisonError::into_inner).values().cloned().collect()
    }
}

#[async_trait]
impl CorpusStore for MemoryCorpusStore {
    async fn get_word(&self, id: &WordId) -> Result<Option<Word>> {
        Ok(self.words.read().unwrap_or_else(PoisonError::into_inner).get(id).cloned())
    }

    async fn insert_word(&self, word: &Word) -> Result<()> {
        self.words
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(word.id.clone(), word.clone());
        Ok(())
    }

    async fn find_unannotated_word(&self) -> Result<Option<Word>> {
        Ok(self
            .words
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|w| w.needs_annotation())
            .cloned())
    }

    async fn find_sentence(&self, sentence: SentenceRef) -> Result<Vec<Word>> {
        let mut words: Vec<Word> = self
            .words
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|w| w.sentence() == sentence)
            .cloned()
            .collect();
        words.sort_by_key(Word::word_count);
        Ok(words)
    }

    async fn set_annotation(
        &self,
        id: &WordId,
        components: &Components,
        translation: &str,
    ) -> Result<()> {
        if let Some(word) = self.words.write().unwrap_or_else(PoisonError::into_inner).get_mut(id) {
            word.components = Some(components.clone());
            word.translation = Some(translation.to_string());
        }
        Ok(())
    }

    async fn next_root_candidate(&self, after: Option<&WordId>) -> Result<Option<Word>> {
        let words = self.words.read().unwrap_or_else(PoisonError::into_inner);
        let lower = match after {
            Some(id) => Bound::Excluded(id.clone()),
            None => Bound::Unbounded,
        };
        Ok(words
            .range((lower, Bound::Unbounded))
            .map(|(_, w)| w)
            .find(|w| w.is_root_candidate())
            .cloned())
    }

    async fn upsert_root(&self, root: &str, word_id: &WordId) -> Result<Root> {
        let mut roots = self.roots.write().unwrap_or_else(PoisonError::into_inner);
        let entry = roots
            .entry(root.to_string())
            .or_insert_with(|| Root::new(root));
        entry.link(word_id);
        Ok(entry.clone())
    }

    async fn set_root_link(&self, id: &WordId, link: &RootLink) -> Result<()> {
        if let Some(word) = self.words.write().unwrap_or_else(PoisonError::into_inner).get_mut(id) {
            word.root = link.clone();
        }
        Ok(())
    }

    async fn get_root(&self, root: &str) -> Result<Option<Root>> {
        Ok(self.roots.read().unwrap_or_else(PoisonError::into_inner).get(root).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
