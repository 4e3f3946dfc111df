//! Positional check between oracle output and the local sentence.
//!
//! Two tokens align when every character of one occurs in the other, in both
//! directions. Multiplicity and order are ignored, so anagrams and tokens that
//! differ only in repeated characters are accepted.

use std::collections::HashSet;

use crate::common::hebrew;
use crate::domains::corpus::Word;
use crate::domains::morphology::types::WordAnalysis;
use crate::error::{PipelineError, Result};

/// Character-set equality.
pub fn tokens_align(expected: &str, actual: &str) -> bool {
    let expected: HashSet<char> = expected.chars().collect();
    let actual: HashSet<char> = actual.chars().collect();
    expected.is_subset(&actual) && actual.is_subset(&expected)
}

/// Check the whole oracle answer against the sentence before anything is
/// written. Both sides are compared as prompt tokens.
pub fn verify_alignment(sentence: &[Word], analyses: &[WordAnalysis]) -> Result<()> {
    if sentence.len() != analyses.len() {
        return Err(PipelineError::SentenceLength {
            expected: sentence.len(),
            actual: analyses.len(),
        });
    }

    for (position, (word, analysis)) in sentence.iter().zip(analyses).enumerate() {
        let expected = hebrew::prompt_token(&word.word_with_symbols);
        let actual = hebrew::prompt_token(&analysis.word);
        if !tokens_align(&expected, &actual) {
            return Err(PipelineError::Alignment {
                position,
                expected,
                actual,
            });
        }
    }

    Ok(())
}
