// Common types and utilities shared across the application

pub mod hebrew;
pub mod word_id;

pub use word_id::{SentenceRef, WordId, WordIdError};
