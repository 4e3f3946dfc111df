use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::{SentenceRef, WordId};

/// Parts of speech that take part in root resolution.
pub const ROOT_BEARING_PARTS_OF_SPEECH: [&str; 2] = ["noun", "verb"];

/// Morphological breakdown of one word. Every field may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// All parts of speech the word carries, lowercase
    pub parts_of_speech: Option<Vec<String>>,
    /// Attached grammatical prefix, e.g. a preposition or the definite article
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub tense: Option<String>,
    pub person: Option<String>,
    pub gender: Option<String>,
    pub number: Option<String>,
    pub possessive: Option<String>,
}

impl Components {
    pub fn parts_of_speech(&self) -> &[String] {
        self.parts_of_speech.as_deref().unwrap_or_default()
    }

    /// Noun or verb, the parts of speech listed in the lexicon by root.
    pub fn bears_root(&self) -> bool {
        self.parts_of_speech()
            .iter()
            .any(|p| ROOT_BEARING_PARTS_OF_SPEECH.contains(&p.as_str()))
    }

    /// Non-blank prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Outcome of root resolution for a word.
///
/// `Unsearched` and `NotFound` are different states: only `Unsearched` words
/// are picked up by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RootLink {
    #[default]
    Unsearched,
    NotFound,
    Resolved(String),
}

impl RootLink {
    pub fn is_unsearched(&self) -> bool {
        matches!(self, Self::Unsearched)
    }

    pub fn root(&self) -> Option<&str> {
        match self {
            Self::Resolved(root) => Some(root),
            _ => None,
        }
    }
}

/// One token occurrence in the corpus.
///
/// `components` and `translation` are `None` while absent from the record;
/// a present value, even an empty one, counts as annotated.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub id: WordId,
    /// Consonants only
    pub word: String,
    /// Full form with vowel points and cantillation
    pub word_with_symbols: String,
    pub components: Option<Components>,
    pub translation: Option<String>,
    pub root: RootLink,
}

impl Word {
    pub fn new(id: WordId, word: impl Into<String>, word_with_symbols: impl Into<String>) -> Self {
        Self {
            id,
            word: word.into(),
            word_with_symbols: word_with_symbols.into(),
            components: None,
            translation: None,
            root: RootLink::Unsearched,
        }
    }

    pub fn sentence(&self) -> SentenceRef {
        self.id.sentence()
    }

    pub fn word_count(&self) -> u32 {
        self.id.word_count()
    }

    pub fn needs_annotation(&self) -> bool {
        self.components.is_none() || self.translation.is_none()
    }

    pub fn is_root_candidate(&self) -> bool {
        self.root.is_unsearched()
            && self
                .components
                .as_ref()
                .map(Components::bears_root)
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word() -> Word {
        Word::new(WordId::new(1, 1, 1, 1).unwrap(), "ברא", "בָּרָא")
    }

    #[test]
    fn test_presence_not_content_decides_annotation() {
        let mut w = word();
        assert!(w.needs_annotation());

        w.components = Some(Components::default());
        assert!(w.needs_annotation(), "translation still absent");

        w.translation = Some(String::new());
        assert!(!w.needs_annotation(), "empty values are present values");
    }

    #[test]
    fn test_root_candidate_requires_noun_or_verb_and_unsearched() {
        let mut w = word();
        assert!(!w.is_root_candidate(), "no components yet");

        w.components = Some(Components {
            parts_of_speech: Some(vec!["adverb".into(), "verb".into()]),
            ..Default::default()
        });
        assert!(w.is_root_candidate());

        w.root = RootLink::NotFound;
        assert!(!w.is_root_candidate());

        w.root = RootLink::Resolved("ברא".into());
        assert!(!w.is_root_candidate());
    }

    #[test]
    fn test_blank_prefix_is_no_prefix() {
        let components = Components {
            prefix: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(components.prefix(), None);
        assert!(!components.bears_root());
    }
}
