// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Matching lexicon results against corpus words lives in the roots domain.
//
// Naming convention: Base* for trait names (e.g., BaseLexicon)

use async_trait::async_trait;

use crate::error::Result;

// =============================================================================
// Lexicon Trait (Infrastructure - dictionary site lookups)
// =============================================================================

#[async_trait]
pub trait BaseLexicon: Send + Sync {
    /// Fetch the search-results page for a consonantal word (returns raw HTML)
    async fn search(&self, word: &str) -> Result<String>;
}
