//! Positional word identity.
//!
//! A word is addressed by `(book, chapter, verse, position)`, encoded as the
//! fixed-width key `1BBCCCVVVPP`. Because every segment is zero-padded,
//! lexicographic order on the key is reading order.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

const KEY_LEN: usize = 11;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordIdError {
    #[error("{segment} {value} does not fit in {width} digits")]
    OutOfRange {
        segment: &'static str,
        value: u32,
        width: usize,
    },

    #[error("malformed word id: {0}")]
    Malformed(String),
}

/// The `(book, chapter, verse)` triple shared by every word of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SentenceRef {
    pub book: u32,
    pub chapter: u32,
    pub verse: u32,
}

impl SentenceRef {
    pub fn new(book: u32, chapter: u32, verse: u32) -> Self {
        Self {
            book,
            chapter,
            verse,
        }
    }
}

impl Display for SentenceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.book, self.chapter, self.verse)
    }
}

/// Identity of a word occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WordId(String);

impl WordId {
    pub fn new(book: u32, chapter: u32, verse: u32, word_count: u32) -> Result<Self, WordIdError> {
        check("book", book, 2)?;
        check("chapter", chapter, 3)?;
        check("verse", verse, 3)?;
        check("word count", word_count, 2)?;
        Ok(Self(format!(
            "1{:02}{:03}{:03}{:02}",
            book, chapter, verse, word_count
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn book(&self) -> u32 {
        self.segment(1..3)
    }

    pub fn chapter(&self) -> u32 {
        self.segment(3..6)
    }

    pub fn verse(&self) -> u32 {
        self.segment(6..9)
    }

    pub fn word_count(&self) -> u32 {
        self.segment(9..11)
    }

    pub fn sentence(&self) -> SentenceRef {
        SentenceRef::new(self.book(), self.chapter(), self.verse())
    }

    // Only reachable on keys that passed `from_str` or `new`.
    fn segment(&self, range: std::ops::Range<usize>) -> u32 {
        self.0[range].parse().unwrap_or_default()
    }
}

fn check(segment: &'static str, value: u32, width: usize) -> Result<(), WordIdError> {
    if value >= 10u32.pow(width as u32) {
        return Err(WordIdError::OutOfRange {
            segment,
            value,
            width,
        });
    }
    Ok(())
}

impl FromStr for WordId {
    type Err = WordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed =
            s.len() == KEY_LEN && s.starts_with('1') && s.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(WordIdError::Malformed(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for WordId {
    type Error = WordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WordId> for String {
    fn from(id: WordId) -> Self {
        id.0
    }
}

impl Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
