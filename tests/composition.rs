// Engine-level composition tests over the in-memory store: embedding
// refresh, clustering runs, semantic search, and degraded generation when
// the provider fails.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use kindling::engine::BoardEngine;
use kindling::generate::template::TemplateGenerator;
use kindling::generate::traits::IdeaGenerator;
use kindling::semantic::embed::EMBEDDING_DIM;
use kindling::semantic::traits::HashEmbedder;
use kindling::store::memory::MemoryStore;
use kindling::store::models::Mood;
use kindling::store::traits::CardStore;

fn engine_over(store: Arc<MemoryStore>) -> BoardEngine {
    BoardEngine::new(store, Arc::new(HashEmbedder), Arc::new(TemplateGenerator))
}

/// A generator that always fails — exercises the degradation paths.
struct BrokenGenerator;

#[async_trait]
impl IdeaGenerator for BrokenGenerator {
    async fn suggest(&self, _: &str, _: &str, _: &[String]) -> Result<Vec<String>> {
        anyhow::bail!("provider unreachable")
    }
    async fn board_insights(&self, _: &[String], _: usize) -> Result<String> {
        anyhow::bail!("provider unreachable")
    }
    async fn classify_mood(&self, _: &str) -> Result<Mood> {
        anyhow::bail!("provider unreachable")
    }
}

// ============================================================
// Embedding refresh
// ============================================================

#[tokio::test]
async fn ensure_embeddings_fills_missing_vectors() {
    let store = Arc::new(MemoryStore::new());
    store.add_card("Solar roof", "panels on the office").await.unwrap();
    store.add_card("Tax filing", "quarterly deadline").await.unwrap();

    let engine = engine_over(Arc::clone(&store));
    assert_eq!(engine.ensure_embeddings().await.unwrap(), 2);

    for card in store.list_cards().await.unwrap() {
        let vector = card.embedding.as_ref().expect("vector stored");
        assert_eq!(vector.len(), EMBEDDING_DIM);
        assert_eq!(card.embedded_text.as_deref(), Some(card.text().as_str()));
    }

    // Second pass finds nothing stale
    assert_eq!(engine.ensure_embeddings().await.unwrap(), 0);
}

// ============================================================
// Clustering runs
// ============================================================

#[tokio::test]
async fn cluster_board_groups_labels_and_persists() {
    let store = Arc::new(MemoryStore::new());
    let a = store.add_card("Launch mobile app", "").await.unwrap();
    let b = store.add_card("Launch mobile application", "").await.unwrap();
    let c = store.add_card("Quarterly tax filing", "").await.unwrap();

    let engine = engine_over(Arc::clone(&store));
    let summaries = engine.cluster_board(0.3).await.unwrap();

    assert_eq!(summaries.len(), 2);
    // Summaries come back in cluster-index order and card counts match
    assert_eq!(summaries[0].cluster_id, "cluster-0");
    assert!(summaries.iter().all(|s| s.card_count == s.card_ids.len()));
    assert!(summaries.iter().all(|s| !s.label.is_empty()));

    let pair = summaries.iter().find(|s| s.card_count == 2).unwrap();
    assert!(pair.card_ids.contains(&a.id) && pair.card_ids.contains(&b.id));

    // Assignments are persisted on the cards
    let stored_c = store.get_card(&c.id).await.unwrap().unwrap();
    let singleton = summaries.iter().find(|s| s.card_count == 1).unwrap();
    assert_eq!(stored_c.cluster_id.as_deref(), Some(singleton.cluster_id.as_str()));
}

#[tokio::test]
async fn recluster_replaces_prior_assignments() {
    let store = Arc::new(MemoryStore::new());
    store.add_card("Solar energy", "").await.unwrap();
    store.add_card("Wind energy", "").await.unwrap();

    let engine = engine_over(Arc::clone(&store));
    engine.cluster_board(0.0).await.unwrap();
    let merged: Vec<_> = store.list_cards().await.unwrap();
    assert!(merged.iter().all(|c| c.cluster_id.is_some()));

    // A stricter run re-partitions from scratch
    engine.cluster_board(0.99).await.unwrap();
    let strict = store.list_cards().await.unwrap();
    let distinct: std::collections::HashSet<_> = strict
        .iter()
        .filter_map(|c| c.cluster_id.clone())
        .collect();
    assert_eq!(distinct.len(), 2);
}

#[tokio::test]
async fn cluster_empty_board_returns_no_summaries() {
    let engine = engine_over(Arc::new(MemoryStore::new()));
    assert!(engine.cluster_board(0.5).await.unwrap().is_empty());
}

// ============================================================
// Semantic search
// ============================================================

#[tokio::test]
async fn search_ranks_the_relevant_card_first() {
    let store = Arc::new(MemoryStore::new());
    let solar = store
        .add_card("Rooftop solar", "solar panels with battery storage")
        .await
        .unwrap();
    store.add_card("Quarterly taxes", "file the paperwork").await.unwrap();

    let engine = engine_over(Arc::clone(&store));
    let hits = engine.search("solar panel energy", 0.1, 10).await.unwrap();

    assert!(!hits.is_empty());
    assert_eq!(hits[0].card.id, solar.id);
    // Scores sorted descending
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn search_respects_min_score_and_limit() {
    let store = Arc::new(MemoryStore::new());
    for i in 0..5 {
        store
            .add_card(&format!("Solar idea {i}"), "solar panels")
            .await
            .unwrap();
    }
    let engine = engine_over(Arc::clone(&store));

    let limited = engine.search("solar panels", 0.1, 2).await.unwrap();
    assert_eq!(limited.len(), 2);

    let impossible = engine.search("solar panels", 0.999999, 10).await.unwrap();
    assert!(impossible.iter().all(|h| h.score > 0.999999));
}

#[tokio::test]
async fn search_with_no_signal_query_matches_nothing() {
    let store = Arc::new(MemoryStore::new());
    store.add_card("Solar roof", "panels").await.unwrap();
    let engine = engine_over(Arc::clone(&store));

    // Stop-words-only query embeds to the zero vector
    let hits = engine.search("the and for", 0.0, 10).await.unwrap();
    assert!(hits.is_empty());
}

// ============================================================
// Generation — normal and degraded paths
// ============================================================

#[tokio::test]
async fn suggest_returns_template_lines_for_template_backend() {
    let store = Arc::new(MemoryStore::new());
    let card = store.add_card("Compost program", "").await.unwrap();
    let engine = engine_over(Arc::clone(&store));

    let suggestions = engine.suggest(&card.id).await.unwrap();
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|s| s.contains("Compost program")));
}

#[tokio::test]
async fn suggest_degrades_when_provider_fails() {
    let store = Arc::new(MemoryStore::new());
    let card = store.add_card("Compost program", "").await.unwrap();
    let engine = BoardEngine::new(
        Arc::clone(&store) as Arc<dyn CardStore>,
        Arc::new(HashEmbedder),
        Arc::new(BrokenGenerator),
    );

    // Provider failure is not a user-visible error
    let suggestions = engine.suggest(&card.id).await.unwrap();
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|s| s.contains("Compost program")));
}

#[tokio::test]
async fn suggest_unknown_card_is_an_error() {
    let engine = engine_over(Arc::new(MemoryStore::new()));
    assert!(engine.suggest("card-99").await.is_err());
}

#[tokio::test]
async fn mood_defaults_to_neutral_when_provider_fails() {
    let store = Arc::new(MemoryStore::new());
    let card = store.add_card("Exciting launch!", "").await.unwrap();
    let engine = BoardEngine::new(
        Arc::clone(&store) as Arc<dyn CardStore>,
        Arc::new(HashEmbedder),
        Arc::new(BrokenGenerator),
    );

    assert_eq!(engine.classify_mood(&card.id).await.unwrap(), Mood::Neutral);
    let stored = store.get_card(&card.id).await.unwrap().unwrap();
    assert_eq!(stored.mood, Some(Mood::Neutral));
}

#[tokio::test]
async fn summarize_empty_board_is_friendly() {
    let engine = engine_over(Arc::new(MemoryStore::new()));
    let summary = engine.summarize().await.unwrap();
    assert!(summary.contains("No cards to summarize"));
}

#[tokio::test]
async fn summarize_includes_themes_and_insights_even_degraded() {
    let store = Arc::new(MemoryStore::new());
    store
        .add_card("Solar roof", "solar panels everywhere")
        .await
        .unwrap();
    store.add_card("Solar garden", "community solar").await.unwrap();
    let engine = BoardEngine::new(
        Arc::clone(&store) as Arc<dyn CardStore>,
        Arc::new(HashEmbedder),
        Arc::new(BrokenGenerator),
    );

    let summary = engine.summarize().await.unwrap();
    assert!(summary.contains("Key Themes"));
    assert!(summary.contains("Solar"), "dominant theme surfaced");
    assert!(summary.contains("Next Steps"), "template insights present");
}

// ============================================================
// SQLite backing (same engine, real database file)
// ============================================================

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn engine_works_over_a_sqlite_store() {
    use kindling::store::sqlite::SqliteStore;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("board.db");
    let conn = kindling::store::initialize(db_path.to_str().unwrap()).unwrap();
    let store = Arc::new(SqliteStore::new(conn));

    store.add_card("Launch mobile app", "").await.unwrap();
    store.add_card("Launch mobile application", "").await.unwrap();

    let engine = BoardEngine::new(
        Arc::clone(&store) as Arc<dyn CardStore>,
        Arc::new(HashEmbedder),
        Arc::new(TemplateGenerator),
    );

    let summaries = engine.cluster_board(0.3).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].card_count, 2);

    let hits = engine.search("mobile app launch", 0.1, 10).await.unwrap();
    assert_eq!(hits.len(), 2);
}
