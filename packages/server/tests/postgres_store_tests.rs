//! Integration tests for the Postgres corpus store.
//!
//! Each test runs against its own migrated database in a shared container.

mod common;

use crate::common::*;
use annotator_core::domains::corpus::{CorpusStore, RootLink};
use annotator_core::domains::morphology::{next_sentence, AnnotationPipeline, AnnotationStats};
use annotator_core::{AnnotationConfig, PipelineError};
use oracle_client::testing::MockBackend;
use std::sync::Arc;
use test_context::test_context;

// =============================================================================
// Root link encoding
// =============================================================================

#[test_context(DatabaseHarness)]
#[tokio::test]
async fn root_link_states_survive_a_round_trip(ctx: &DatabaseHarness) {
    // Arrange
    let store = &ctx.store;
    store.upsert_root("ברא", &word_id(1, 1, 1, 3)).await.unwrap();

    let unsearched = annotated(word(1, 1, 1, 1, BARA), &["verb"], None);
    let not_found = searched(word(1, 1, 1, 2, BARA), RootLink::NotFound);
    let resolved = searched(word(1, 1, 1, 3, BARA), RootLink::Resolved("ברא".into()));

    // Act
    for w in [&unsearched, &not_found, &resolved] {
        store.insert_word(w).await.unwrap();
    }

    // Assert
    for w in [&unsearched, &not_found, &resolved] {
        let loaded = store.get_word(&w.id).await.unwrap().expect("word stored");
        assert_eq!(&loaded, w);
    }
}

#[test_context(DatabaseHarness)]
#[tokio::test]
async fn not_found_sentinel_is_distinct_from_unsearched(ctx: &DatabaseHarness) {
    let store = &ctx.store;
    let target = annotated(word(1, 1, 1, 1, BARA), &["verb"], None);
    store.insert_word(&target).await.unwrap();

    assert_eq!(
        store.next_root_candidate(None).await.unwrap().map(|w| w.id),
        Some(target.id.clone())
    );

    store.set_root_link(&target.id, &RootLink::NotFound).await.unwrap();

    let loaded = store.get_word(&target.id).await.unwrap().unwrap();
    assert_eq!(loaded.root, RootLink::NotFound);
    assert!(store.next_root_candidate(None).await.unwrap().is_none());
}

// =============================================================================
// Root candidates
// =============================================================================

#[test_context(DatabaseHarness)]
#[tokio::test]
async fn root_candidates_are_unsearched_nouns_and_verbs_after_the_cursor(ctx: &DatabaseHarness) {
    let store = &ctx.store;
    let noun = annotated(word(1, 1, 1, 1, BERESHIT), &["preposition", "noun"], Some("ב"));
    let adverb = annotated(word(1, 1, 1, 2, BARA), &["adverb"], None);
    let unannotated = word(1, 1, 1, 3, BARA);
    let done = searched(word(1, 1, 1, 4, BARA), RootLink::NotFound);
    let verb = annotated(word(1, 1, 2, 1, BARA), &["verb"], None);
    for w in [&verb, &done, &unannotated, &adverb, &noun] {
        store.insert_word(w).await.unwrap();
    }

    let first = store.next_root_candidate(None).await.unwrap().unwrap();
    let second = store.next_root_candidate(Some(&first.id)).await.unwrap().unwrap();
    let rest = store.next_root_candidate(Some(&second.id)).await.unwrap();

    assert_eq!(first.id, noun.id);
    assert_eq!(second.id, verb.id);
    assert!(rest.is_none());
}

// =============================================================================
// Roots
// =============================================================================

#[test_context(DatabaseHarness)]
#[tokio::test]
async fn upsert_root_keeps_word_ids_a_set(ctx: &DatabaseHarness) {
    let store = &ctx.store;
    let first = word_id(1, 1, 1, 2);
    let second = word_id(1, 2, 3, 4);

    let created = store.upsert_root("ברא", &first).await.unwrap();
    assert_eq!(created.word_ids, vec![first.clone()]);

    let repeated = store.upsert_root("ברא", &first).await.unwrap();
    assert_eq!(repeated.word_ids, vec![first.clone()]);

    let extended = store.upsert_root("ברא", &second).await.unwrap();
    assert_eq!(extended.word_ids, vec![first, second]);

    let stored = store.get_root("ברא").await.unwrap().expect("root stored");
    assert_eq!(stored, extended);
    assert!(store.get_root("אבב").await.unwrap().is_none());
}

// =============================================================================
// Sentences and annotation
// =============================================================================

#[test_context(DatabaseHarness)]
#[tokio::test]
async fn sentence_comes_back_in_word_order(ctx: &DatabaseHarness) {
    let store = &ctx.store;
    for w in [
        word(1, 1, 2, 1, "וְהָאָרֶץ"),
        word(1, 1, 1, 3, "הַשָּׁמַיִם"),
        word(1, 1, 1, 1, BERESHIT),
        word(1, 1, 1, 2, BARA),
    ] {
        store.insert_word(&w).await.unwrap();
    }

    let sentence = next_sentence(store).await.unwrap().expect("work remains");

    let ids: Vec<_> = sentence.iter().map(|w| w.id.clone()).collect();
    assert_eq!(
        ids,
        vec![word_id(1, 1, 1, 1), word_id(1, 1, 1, 2), word_id(1, 1, 1, 3)]
    );
}

#[test_context(DatabaseHarness)]
#[tokio::test]
async fn annotation_pass_persists_through_postgres(ctx: &DatabaseHarness) {
    let store = Arc::new(ctx.store.clone());
    for w in [word(1, 1, 1, 1, BERESHIT), word(1, 1, 1, 2, BARA)] {
        store.insert_word(&w).await.unwrap();
    }
    let oracle = MockBackend::new().with_response(morphology_response(vec![
        analysis(BERESHIT, &["noun"], "in the beginning"),
        analysis(BARA, &["verb"], "created"),
    ]));
    let pipeline =
        AnnotationPipeline::new(store.clone(), Arc::new(oracle), AnnotationConfig::default())
            .unwrap();

    let stats = pipeline.run_to_exhaustion().await.unwrap();

    assert_eq!(stats, AnnotationStats { sentences: 1, words: 2 });
    assert!(store.find_unannotated_word().await.unwrap().is_none());
    let bara = store.get_word(&word_id(1, 1, 1, 2)).await.unwrap().unwrap();
    assert_eq!(bara.translation.as_deref(), Some("created"));
    assert!(bara.components.unwrap().bears_root());
}

#[test_context(DatabaseHarness)]
#[tokio::test]
async fn row_filed_under_another_verse_is_reported(ctx: &DatabaseHarness) {
    let store = &ctx.store;
    store.insert_word(&word(1, 1, 1, 1, BERESHIT)).await.unwrap();
    sqlx::query("UPDATE words SET verse = 9 WHERE id = $1")
        .bind(word_id(1, 1, 1, 1).as_str())
        .execute(ctx.pool())
        .await
        .unwrap();

    let err = next_sentence(store).await.unwrap_err();

    assert!(matches!(err, PipelineError::InconsistentSentence { .. }));
}
