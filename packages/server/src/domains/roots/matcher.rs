//! Fuzzy matching of a corpus word against lexicon search results.
//!
//! The lexicon lists each entry with one or more vocalized forms and the root
//! it belongs to. A word matches an entry when one of its forms equals one of
//! the word's candidate spellings:
//!
//! - the niqqud-bearing form
//! - the same with dagesh removed
//! - `prefix־ + stem` when the word carries a prefix (with and without dagesh)

use scraper::{Html, Selector};

use crate::common::hebrew::{self, MAQAF};
use crate::domains::corpus::Word;
use crate::error::{PipelineError, Result};

/// CSS selectors locating entries and their parts on a search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconSelectors {
    pub entry: String,
    pub form: String,
    pub root: String,
}

impl Default for LexiconSelectors {
    fn default() -> Self {
        Self {
            entry: ".verb-search-result".to_string(),
            form: ".menukad".to_string(),
            root: ".verb-search-root".to_string(),
        }
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Vocalized display forms, in page order
    pub forms: Vec<String>,
    /// Root as displayed, usually letters joined by dashes
    pub root_text: String,
}

impl LexiconEntry {
    pub fn root_letters(&self) -> String {
        hebrew::consonantal(&self.root_text)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| PipelineError::Lexicon(format!("invalid selector {:?}: {}", css, e)))
}

/// Extract entries from a search-results page in document order.
pub fn parse_search_results(html: &str, selectors: &LexiconSelectors) -> Result<Vec<LexiconEntry>> {
    let entry_selector = selector(&selectors.entry)?;
    let form_selector = selector(&selectors.form)?;
    let root_selector = selector(&selectors.root)?;

    let document = Html::parse_document(html);
    let entries = document
        .select(&entry_selector)
        .map(|entry| LexiconEntry {
            forms: entry
                .select(&form_selector)
                .map(|form| form.text().collect::<String>().trim().to_string())
                .filter(|form| !form.is_empty())
                .collect(),
            root_text: entry
                .select(&root_selector)
                .next()
                .map(|root| root.text().collect::<String>().trim().to_string())
                .unwrap_or_default(),
        })
        .collect();

    Ok(entries)
}

/// What to search for and which spellings count as a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    /// Query sent to the lexicon
    pub query: String,
    /// Accepted display forms, most specific first
    pub candidates: Vec<String>,
}

impl SearchKey {
    /// `None` when the word has no letters or vowel points to match on, or
    /// nothing to send as a query.
    pub fn for_word(word: &Word) -> Option<Self> {
        let niqqud = hebrew::vocalized(&word.word_with_symbols);
        if niqqud.is_empty() {
            return None;
        }

        let mut candidates = Vec::with_capacity(4);
        push_with_dagesh_variant(&mut candidates, niqqud.clone());

        let prefix = word.components.as_ref().and_then(|c| c.prefix());
        if let Some((prefix, stem)) = prefix.and_then(|p| hebrew::split_prefix(&niqqud, p)) {
            push_with_dagesh_variant(&mut candidates, format!("{}{} + {}", prefix, MAQAF, stem));
        }

        let query = if word.word.is_empty() {
            hebrew::consonantal(&niqqud)
        } else {
            word.word.clone()
        };
        if query.is_empty() {
            return None;
        }

        Some(Self { query, candidates })
    }

    pub fn matches(&self, form: &str) -> bool {
        self.candidates.iter().any(|c| c == form)
    }
}

fn push_with_dagesh_variant(candidates: &mut Vec<String>, form: String) {
    let stripped = hebrew::strip_dagesh(&form);
    candidates.push(form);
    if !candidates.contains(&stripped) {
        candidates.push(stripped);
    }
}

/// Root letters of the first entry that has a matching form and a root
/// with at least one letter.
pub fn find_root(entries: &[LexiconEntry], key: &SearchKey) -> Option<String> {
    entries
        .iter()
        .filter(|entry| entry.forms.iter().any(|form| key.matches(form)))
        .map(LexiconEntry::root_letters)
        .find(|root| !root.is_empty())
}
