use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::corpus::Components;

/// Oracle answer for one sentence (structured output must be a top-level object).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MorphologyResponse {
    /// One entry per input word, in input order
    pub words: Vec<WordAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WordAnalysis {
    /// The word exactly as it appeared in the input
    pub word: String,
    pub components: Components,
    pub translation: String,
}

/// Counters for one annotation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationStats {
    pub sentences: usize,
    pub words: usize,
}
