//! Corpus domain: words, roots, and the store that owns them.

pub mod models;
pub mod store;

pub use models::{Components, Root, RootLink, Word, ROOT_BEARING_PARTS_OF_SPEECH};
pub use store::{CorpusStore, MemoryCorpusStore, PostgresCorpusStore};
