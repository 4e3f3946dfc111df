//! Morphological annotation of corpus sentences by the oracle.

pub mod alignment;
pub mod pipeline;
pub mod prompts;
pub mod selector;
pub mod types;

pub use alignment::{tokens_align, verify_alignment};
pub use pipeline::AnnotationPipeline;
pub use selector::next_sentence;
pub use types::{AnnotationStats, MorphologyResponse, WordAnalysis};
