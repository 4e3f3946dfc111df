use tracing::debug;

use crate::domains::corpus::{CorpusStore, Word};
use crate::error::{PipelineError, Result};

/// Next sentence that still has a word without `components` or `translation`.
///
/// Returns the whole sentence, annotated words included, in ascending word
/// position. `None` when the corpus is fully annotated. Fails with
/// `InconsistentSentence` when the loaded sentence lacks the word that
/// selected it.
pub async fn next_sentence(store: &dyn CorpusStore) -> Result<Option<Vec<Word>>> {
    let Some(seed) = store.find_unannotated_word().await? else {
        return Ok(None);
    };

    let sentence = seed.sentence();
    let words = store.find_sentence(sentence).await?;
    debug!(%sentence, seed = %seed.id, words = words.len(), "selected sentence");

    // Without the seed the same word would be selected again forever
    if !words.iter().any(|w| w.id == seed.id) {
        return Err(PipelineError::InconsistentSentence {
            sentence: sentence.to_string(),
            seed: seed.id.to_string(),
        });
    }

    Ok(Some(words))
}
