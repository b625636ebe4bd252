// Data models — the types that flow through the engine.
//
// Kept separate from the storage backends so the semantic core and the
// terminal output can use them without depending on rusqlite.

use serde::{Deserialize, Serialize};

/// A single idea card — the unit of embedding and clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub description: String,
    pub mood: Option<Mood>,
    pub cluster_id: Option<String>,
    /// 384-dimensional L2-normalized vector (JSON-encoded in the DB).
    /// Recomputed wholesale whenever the card's text changes, never
    /// partially updated.
    pub embedding: Option<Vec<f64>>,
    /// The exact text the stored embedding was computed from. A mismatch
    /// against the current text marks the vector stale.
    pub embedded_text: Option<String>,
    pub created_at: String,
}

impl Card {
    /// The text unit that gets embedded: title + " " + description.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// Whether the stored vector still matches the card's current text.
    pub fn embedding_is_fresh(&self) -> bool {
        match (&self.embedding, &self.embedded_text) {
            (Some(v), Some(snapshot)) => !v.is_empty() && *snapshot == self.text(),
            _ => false,
        }
    }
}

/// Mood classification for a card, assigned by the text-generation
/// provider. Anything the provider says outside this set maps to Neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Negative,
    Neutral,
    Excited,
    Thoughtful,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Negative => "negative",
            Mood::Neutral => "neutral",
            Mood::Excited => "excited",
            Mood::Thoughtful => "thoughtful",
        }
    }

    /// Parse a provider's one-word answer. Unknown words are None so the
    /// caller can apply the Neutral default explicitly.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "positive" => Some(Mood::Positive),
            "negative" => Some(Mood::Negative),
            "neutral" => Some(Mood::Neutral),
            "excited" => Some(Mood::Excited),
            "thoughtful" => Some(Mood::Thoughtful),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Positive => "😊",
            Mood::Negative => "😟",
            Mood::Neutral => "😐",
            Mood::Excited => "🎉",
            Mood::Thoughtful => "🤔",
        }
    }
}

/// One labeled cluster in a clustering run's display payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: String,
    pub label: String,
    pub card_ids: Vec<String>,
    pub card_count: usize,
}

/// A semantic search hit: a card with its similarity to the query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub card: Card,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, description: &str) -> Card {
        Card {
            id: "card-1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            mood: None,
            cluster_id: None,
            embedding: None,
            embedded_text: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_text_unit_concatenation() {
        assert_eq!(card("Launch app", "on mobile").text(), "Launch app on mobile");
    }

    #[test]
    fn test_embedding_freshness() {
        let mut c = card("Solar", "panels");
        assert!(!c.embedding_is_fresh());

        c.embedding = Some(vec![0.5; 4]);
        c.embedded_text = Some("Solar panels".to_string());
        assert!(c.embedding_is_fresh());

        c.title = "Wind".to_string();
        assert!(!c.embedding_is_fresh(), "text change must mark vector stale");
    }

    #[test]
    fn test_mood_keyword_parsing() {
        assert_eq!(Mood::from_keyword(" Excited\n"), Some(Mood::Excited));
        assert_eq!(Mood::from_keyword("thoughtful"), Some(Mood::Thoughtful));
        assert_eq!(Mood::from_keyword("grumpy"), None);
    }
}
