// Idea generator trait — the swap-ready abstraction over the
// text-generation provider.
//
// The contract with the provider is deliberately thin: prompt in, text
// out. Implementations must be async because real providers mean HTTP
// calls. The TemplateGenerator gives the same interface with fully
// deterministic output, so the engine can degrade to it whenever the
// provider fails — provider trouble never becomes a user-visible error.

use anyhow::Result;
use async_trait::async_trait;

use crate::store::models::Mood;

#[async_trait]
pub trait IdeaGenerator: Send + Sync {
    /// Generate up to three suggestions complementing a new card, given
    /// the titles/descriptions already on the board as context.
    async fn suggest(
        &self,
        title: &str,
        description: &str,
        board_context: &[String],
    ) -> Result<Vec<String>>;

    /// Free-form insight section for the board summary, given one line
    /// per card.
    async fn board_insights(&self, card_lines: &[String], total_cards: usize) -> Result<String>;

    /// Classify the mood of a card's text.
    async fn classify_mood(&self, text: &str) -> Result<Mood>;
}
