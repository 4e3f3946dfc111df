use crate::common::hebrew;
use crate::domains::corpus::Word;

/// System instruction for sentence-level morphological analysis
pub const MORPHOLOGY_SYSTEM_PROMPT: &str = r#"You are a grammarian of Biblical Hebrew.
Break down the sentence you are given into its words.

Return a JSON object with a single field "words": an array with exactly one
element per input word, in the same order as the input.

Each element has three fields:
- word: the input word copied exactly, with all of its vowel points and marks
- components: the morphology of the word
    - partsOfSpeech: every part of speech the word carries; each one of
      noun, verb, adjective, adverb, preposition, conjunction
    - prefix: an attached prefix such as a preposition, conjunction or the
      definite article, written as it appears in the word (or null)
    - suffix: an attached suffix (or null)
    - tense, person, gender, number, possessive: null when not applicable
- translation: an English translation of the word in the context of the sentence

Do not merge or split words. All text except Hebrew must be lowercase."#;

/// Sentence text as sent to the oracle: prompt tokens joined by single spaces.
pub fn sentence_prompt(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| hebrew::prompt_token(&w.word_with_symbols))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::WordId;

    #[test]
    fn test_sentence_prompt_strips_punctuation_and_joins_with_spaces() {
        let words = vec![
            Word::new(WordId::new(1, 1, 1, 1).unwrap(), "את", "\u{05D0}\u{05B6}\u{05EA}\u{05BE}"),
            Word::new(WordId::new(1, 1, 1, 2).unwrap(), "הארץ", " \u{05D4}\u{05D0}\u{05E8}\u{05E5}\u{05C3}"),
        ];

        assert_eq!(
            sentence_prompt(&words),
            "\u{05D0}\u{05B6}\u{05EA} \u{05D4}\u{05D0}\u{05E8}\u{05E5}"
        );
    }
}
