// Board engine — composes the store, the embedder, the semantic core,
// and the text-generation provider into the operations the CLI exposes.
//
// The numeric core stays pure; this is where I/O ordering is enforced.
// One card's "recompute embedding, then persist" runs as a single task,
// so a clustering or search pass never observes a card whose stored
// vector predates its current text. Across cards the tasks run
// concurrently — embedding a board is an embarrassingly parallel map.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::generate::template;
use crate::generate::traits::IdeaGenerator;
use crate::semantic::cluster::cluster_vectors;
use crate::semantic::embed::EMBEDDING_DIM;
use crate::semantic::label::label_cluster;
use crate::semantic::similarity::cosine_similarity;
use crate::semantic::traits::Embedder;
use crate::store::models::{Card, ClusterSummary, Mood, SearchHit};
use crate::store::traits::CardStore;

/// How many cards refresh their embeddings concurrently.
const EMBED_CONCURRENCY: usize = 8;

/// How many existing cards feed the suggestion prompt as context.
const SUGGEST_CONTEXT_CARDS: usize = 20;

/// Words too generic to surface as board themes.
const SUMMARY_STOP_WORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "been", "will", "your", "their", "system", "platform",
    "powered", "using", "based", "ideas",
];

pub struct BoardEngine {
    store: Arc<dyn CardStore>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn IdeaGenerator>,
}

impl BoardEngine {
    pub fn new(
        store: Arc<dyn CardStore>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn IdeaGenerator>,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
        }
    }

    /// Recompute and persist embeddings for every card whose stored vector
    /// is missing or predates its current text. Returns how many cards
    /// were refreshed.
    pub async fn ensure_embeddings(&self) -> Result<usize> {
        let cards = self.store.list_cards().await?;
        let stale: Vec<Card> = cards
            .into_iter()
            .filter(|c| !c.embedding_is_fresh())
            .collect();

        if stale.is_empty() {
            debug!("All card embeddings are fresh");
            return Ok(0);
        }
        info!(count = stale.len(), "Refreshing stale card embeddings");

        let results: Vec<Result<()>> = stream::iter(stale.into_iter().map(|card| {
            let store = Arc::clone(&self.store);
            let embedder = Arc::clone(&self.embedder);
            async move {
                // Snapshot the text once so the stored vector and its
                // provenance can't drift apart.
                let text = card.text();
                let vector = embedder.embed(&text).await?;
                store.save_embedding(&card.id, &text, &vector).await
            }
        }))
        .buffer_unordered(EMBED_CONCURRENCY)
        .collect()
        .await;

        let mut refreshed = 0;
        for result in results {
            match result {
                Ok(()) => refreshed += 1,
                Err(e) => warn!(error = %e, "Failed to refresh a card embedding"),
            }
        }
        Ok(refreshed)
    }

    /// Run a full clustering pass: refresh embeddings, partition by the
    /// given similarity threshold, label each cluster, and replace all
    /// stored assignments with the new ones.
    pub async fn cluster_board(&self, threshold: f64) -> Result<Vec<ClusterSummary>> {
        self.ensure_embeddings().await?;

        let cards = self.store.list_cards().await?;
        if cards.is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<(String, Vec<f64>)> = cards
            .iter()
            .map(|c| {
                (
                    c.id.clone(),
                    c.embedding
                        .clone()
                        .unwrap_or_else(|| vec![0.0; EMBEDDING_DIM]),
                )
            })
            .collect();

        let clusters = cluster_vectors(&items, threshold);

        let by_id: HashMap<&str, &Card> = cards.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut summaries: Vec<ClusterSummary> = clusters
            .into_iter()
            .map(|(cluster_id, card_ids)| {
                let member_texts: Vec<String> = card_ids
                    .iter()
                    .filter_map(|id| by_id.get(id.as_str()))
                    .map(|c| c.text())
                    .collect();
                let label = label_cluster(&member_texts);
                let card_count = card_ids.len();
                ClusterSummary {
                    cluster_id,
                    label,
                    card_ids,
                    card_count,
                }
            })
            .collect();
        summaries.sort_by_key(|s| cluster_index(&s.cluster_id));

        let assignments: Vec<(String, String)> = summaries
            .iter()
            .flat_map(|s| {
                s.card_ids
                    .iter()
                    .map(|id| (id.clone(), s.cluster_id.clone()))
            })
            .collect();
        self.store.replace_clusters(&assignments).await?;

        info!(
            clusters = summaries.len(),
            cards = cards.len(),
            threshold = threshold,
            "Clustering complete"
        );
        Ok(summaries)
    }

    /// Semantic search: embed the query, score it against every stored
    /// card vector, and return the best matches above `min_score`.
    pub async fn search(&self, query: &str, min_score: f64, limit: usize) -> Result<Vec<SearchHit>> {
        self.ensure_embeddings().await?;

        let query_vector = self.embedder.embed(query).await?;
        let cards = self.store.list_cards().await?;

        let mut hits: Vec<SearchHit> = cards
            .into_iter()
            .filter_map(|card| {
                let score = card
                    .embedding
                    .as_deref()
                    .map(|v| cosine_similarity(&query_vector, v))?;
                (score > min_score).then_some(SearchHit { card, score })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);

        debug!(query = query, hits = hits.len(), "Search complete");
        Ok(hits)
    }

    /// Suggest complementary ideas for an existing card. Provider failure
    /// degrades to the deterministic template set — never an error.
    pub async fn suggest(&self, card_id: &str) -> Result<Vec<String>> {
        let card = self
            .store
            .get_card(card_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("No card with id {card_id}"))?;

        let board_context: Vec<String> = self
            .store
            .list_cards()
            .await?
            .into_iter()
            .filter(|c| c.id != card.id)
            .take(SUGGEST_CONTEXT_CARDS)
            .map(|c| format!("{}: {}", c.title, c.description))
            .collect();

        match self
            .generator
            .suggest(&card.title, &card.description, &board_context)
            .await
        {
            Ok(suggestions) => Ok(suggestions),
            Err(e) => {
                warn!(error = %e, "Suggestion provider failed, using template fallback");
                Ok(template::fallback_suggestions(&card.title))
            }
        }
    }

    /// Classify and persist a card's mood. Provider failure degrades to
    /// Neutral.
    pub async fn classify_mood(&self, card_id: &str) -> Result<Mood> {
        let card = self
            .store
            .get_card(card_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("No card with id {card_id}"))?;

        let mood = match self.generator.classify_mood(&card.text()).await {
            Ok(mood) => mood,
            Err(e) => {
                warn!(error = %e, "Mood provider failed, defaulting to neutral");
                Mood::Neutral
            }
        };
        self.store.save_mood(card_id, mood).await?;
        Ok(mood)
    }

    /// Build the hybrid board summary: programmatic themes, mood and
    /// cluster stats, plus a provider-generated insight section (template
    /// insights when the provider is unavailable).
    pub async fn summarize(&self) -> Result<String> {
        let cards = self.store.list_cards().await?;
        if cards.is_empty() {
            return Ok("No cards to summarize yet. Start adding ideas!".to_string());
        }

        let themes = key_themes(&cards);
        let dominant = dominant_mood(&cards);
        let clusters_found = cards
            .iter()
            .filter_map(|c| c.cluster_id.as_deref())
            .collect::<std::collections::HashSet<_>>()
            .len();

        let card_lines: Vec<String> = cards
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if c.description.is_empty() {
                    format!("{}. **{}**", i + 1, c.title)
                } else {
                    format!("{}. **{}**: {}", i + 1, c.title, c.description)
                }
            })
            .collect();

        let insights = match self
            .generator
            .board_insights(&card_lines, cards.len())
            .await
        {
            Ok(insights) => insights,
            Err(e) => {
                warn!(error = %e, "Insight provider failed, using template insights");
                template::TemplateGenerator
                    .board_insights(&card_lines, cards.len())
                    .await?
            }
        };

        let cluster_note = if clusters_found > 0 {
            format!(
                "\n{clusters_found} idea cluster{} identified — related concepts are grouping together.",
                if clusters_found > 1 { "s" } else { "" }
            )
        } else {
            String::new()
        };

        let theme_lines: Vec<String> = themes
            .iter()
            .take(5)
            .map(|(word, count)| {
                let mut capitalized = word.clone();
                if let Some(first) = capitalized.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("- **{capitalized}** ({count} mentions)")
            })
            .collect();

        let date = chrono::Local::now().format("%Y-%m-%d");
        Ok(format!(
            "## Board Overview\n\
             {} ideas on the board\n\
             Overall mood: {} {}{}\n\n\
             ## Key Themes\n\
             {}\n\n\
             {}\n\n\
             ---\n\
             *Summary generated on {}*",
            cards.len(),
            dominant.emoji(),
            capitalize_word(dominant.as_str()),
            cluster_note,
            theme_lines.join("\n"),
            insights.trim(),
            date,
        ))
    }
}

/// Numeric suffix of a `cluster-<n>` id, used to restore seed order.
fn cluster_index(cluster_id: &str) -> usize {
    cluster_id
        .rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(usize::MAX)
}

/// Most frequent non-trivial words across all card text, highest first
/// (ties by first appearance). At most 8 entries.
fn key_themes(cards: &[Card]) -> Vec<(String, u32)> {
    let combined = cards
        .iter()
        .map(Card::text)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let cleaned: String = combined
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut counts: Vec<(String, u32)> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() <= 3 || SUMMARY_STOP_WORDS.contains(&word) {
            continue;
        }
        match counts.iter_mut().find(|(w, _)| w == word) {
            Some((_, n)) => *n += 1,
            None => counts.push((word.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(8);
    counts
}

/// The most common assigned mood, Neutral when no card has one. Ties go
/// to the mood seen first in card order.
fn dominant_mood(cards: &[Card]) -> Mood {
    let mut counts: Vec<(Mood, u32)> = Vec::new();
    for mood in cards.iter().filter_map(|c| c.mood) {
        match counts.iter_mut().find(|(m, _)| *m == mood) {
            Some((_, n)) => *n += 1,
            None => counts.push((mood, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.first().map(|(m, _)| *m).unwrap_or(Mood::Neutral)
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
