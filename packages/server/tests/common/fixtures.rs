//! Test fixtures for building corpus words and oracle answers.

use annotator_core::common::{hebrew, WordId};
use annotator_core::domains::corpus::{Components, RootLink, Word};
use serde_json::{json, Value};

/// Genesis 1:1, words 1 and 2, as they appear in the pointed text
pub const BERESHIT: &str = "בְּרֵאשִׁית";
pub const BARA: &str = "בָּרָא";

pub fn word_id(book: u32, chapter: u32, verse: u32, position: u32) -> WordId {
    WordId::new(book, chapter, verse, position).expect("valid word id")
}

/// Unannotated, unsearched word.
pub fn word(book: u32, chapter: u32, verse: u32, position: u32, with_symbols: &str) -> Word {
    Word::new(
        word_id(book, chapter, verse, position),
        hebrew::consonantal(with_symbols),
        with_symbols,
    )
}

pub fn components(parts_of_speech: &[&str], prefix: Option<&str>) -> Components {
    Components {
        parts_of_speech: Some(parts_of_speech.iter().map(|p| p.to_string()).collect()),
        prefix: prefix.map(str::to_string),
        ..Default::default()
    }
}

/// Word already annotated with the given parts of speech.
pub fn annotated(mut word: Word, parts_of_speech: &[&str], prefix: Option<&str>) -> Word {
    word.components = Some(components(parts_of_speech, prefix));
    word.translation = Some("annotated".to_string());
    word
}

/// Annotated word that root resolution has already visited.
pub fn searched(word: Word, link: RootLink) -> Word {
    let mut word = annotated(word, &["verb"], None);
    word.root = link;
    word
}

/// One element of a morphology answer.
pub fn analysis(word: &str, parts_of_speech: &[&str], translation: &str) -> Value {
    json!({
        "word": word,
        "components": serde_json::to_value(components(parts_of_speech, None)).expect("components serialize"),
        "translation": translation,
    })
}

pub fn morphology_response(words: Vec<Value>) -> Value {
    json!({ "words": words })
}
