//! Hebrew text normalization.
//!
//! Source tokens carry letters, vowel points (niqqud), cantillation marks and
//! punctuation in one string. The pipelines need different projections of it:
//!
//! - consonantal form: letters only (lexicon query key)
//! - niqqud-bearing form: letters and vowel points (lexicon match key)
//! - prompt token: everything except whitespace and word-level punctuation
//!   (what the oracle sees and echoes back)

use lazy_static::lazy_static;
use regex::Regex;

/// Hebrew hyphen joining a prefix to its stem.
pub const MAQAF: char = '\u{05BE}';

/// Dot marking consonant doubling or a hard consonant.
pub const DAGESH: char = '\u{05BC}';

lazy_static! {
    // Anything outside alef..tav
    static ref NON_LETTER: Regex = Regex::new(r"[^\u{05D0}-\u{05EA}]").unwrap();

    // Anything that is neither a letter nor a vowel point
    // (sheva..dagesh, rafe, shin/sin dots, qamats qatan)
    static ref NON_NIQQUD: Regex = Regex::new(
        r"[^\u{05D0}-\u{05EA}\u{05B0}-\u{05BC}\u{05BF}\u{05C1}\u{05C2}\u{05C7}]"
    ).unwrap();

    // Whitespace, maqaf, paseq, sof pasuq
    static ref PROMPT_NOISE: Regex = Regex::new(r"[\s\u{05BE}\u{05C0}\u{05C3}]").unwrap();
}

pub fn is_letter(c: char) -> bool {
    ('\u{05D0}'..='\u{05EA}').contains(&c)
}

/// Letters only.
pub fn consonantal(text: &str) -> String {
    NON_LETTER.replace_all(text, "").into_owned()
}

/// Letters plus vowel points; cantillation and punctuation dropped.
pub fn vocalized(text: &str) -> String {
    NON_NIQQUD.replace_all(text, "").into_owned()
}

/// The token as sent to the oracle.
pub fn prompt_token(text: &str) -> String {
    PROMPT_NOISE.replace_all(text, "").into_owned()
}

pub fn strip_dagesh(text: &str) -> String {
    text.chars().filter(|&c| c != DAGESH).collect()
}

/// Split `text` after its first `letters` letters, each letter keeping the
/// marks that follow it. `None` when fewer letters exist or nothing remains.
pub fn split_after_letters(text: &str, letters: usize) -> Option<(&str, &str)> {
    let mut seen = 0;
    for (index, c) in text.char_indices() {
        if is_letter(c) {
            if seen == letters {
                return Some((&text[..index], &text[index..]));
            }
            seen += 1;
        }
    }
    None
}

/// Split a niqqud-bearing word into `(prefix, stem)` when its letters start
/// with the letters of `prefix`.
pub fn split_prefix<'a>(word: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let prefix_letters = consonantal(prefix);
    if prefix_letters.is_empty() || !consonantal(word).starts_with(&prefix_letters) {
        return None;
    }
    split_after_letters(word, prefix_letters.chars().count())
}
