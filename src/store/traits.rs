// Card store trait — backend-agnostic async interface for card records.
//
// Implementors: SqliteStore (wraps rusqlite) and MemoryStore (tests and
// throwaway boards). All methods are async so a sync backend (rusqlite via
// Mutex) and any future native-async backend fit behind one interface.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Card, Mood};

#[async_trait]
pub trait CardStore: Send + Sync {
    /// Create a card and return it with its generated id.
    async fn add_card(&self, title: &str, description: &str) -> Result<Card>;

    /// Fetch a single card by id.
    async fn get_card(&self, id: &str) -> Result<Option<Card>>;

    /// All cards in creation order.
    async fn list_cards(&self) -> Result<Vec<Card>>;

    /// Number of cards on the board.
    async fn card_count(&self) -> Result<u32>;

    /// Store a card's embedding together with the text snapshot it was
    /// computed from. One call per card — this is the write half of the
    /// per-card recompute-then-persist unit.
    async fn save_embedding(&self, id: &str, source_text: &str, vector: &[f64]) -> Result<()>;

    /// Record the provider-assigned mood for a card.
    async fn save_mood(&self, id: &str, mood: Mood) -> Result<()>;

    /// Replace all cluster assignments with the given (card_id, cluster_id)
    /// pairs. Cards not listed end up with no cluster — a clustering run
    /// replaces prior assignments wholesale.
    async fn replace_clusters(&self, assignments: &[(String, String)]) -> Result<()>;
}
