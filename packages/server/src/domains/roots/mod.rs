//! Root resolution against the lexicon site.

pub mod matcher;
pub mod pipeline;

pub use matcher::{find_root, parse_search_results, LexiconEntry, LexiconSelectors, SearchKey};
pub use pipeline::{RootResolver, RootStats};
