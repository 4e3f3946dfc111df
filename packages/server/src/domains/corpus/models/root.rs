use serde::{Deserialize, Serialize};

use crate::common::WordId;

/// A consonantal root and the words derived from it.
///
/// The root letters are the identity. `word_ids` behaves as a set: a word is
/// listed once no matter how often it is linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub root: String,
    pub word_ids: Vec<WordId>,
}

impl Root {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            word_ids: Vec::new(),
        }
    }

    /// Add `id` unless already present. Returns whether it was added.
    pub fn link(&mut self, id: &WordId) -> bool {
        if self.word_ids.contains(id) {
            return false;
        }
        self.word_ids.push(id.clone());
        true
    }
}
