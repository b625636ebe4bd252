// MemoryStore — in-memory CardStore for tests and throwaway boards.
//
// Same semantics as SqliteStore, including the wholesale cluster
// replacement, minus persistence.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::models::{Card, Mood};
use super::traits::CardStore;

#[derive(Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<Card>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn add_card(&self, title: &str, description: &str) -> Result<Card> {
        let mut cards = self.cards.lock().await;
        let card = Card {
            id: format!("card-{}", cards.len() + 1),
            title: title.to_string(),
            description: description.to_string(),
            mood: None,
            cluster_id: None,
            embedding: None,
            embedded_text: None,
            created_at: Utc::now().to_rfc3339(),
        };
        cards.push(card.clone());
        Ok(card)
    }

    async fn get_card(&self, id: &str) -> Result<Option<Card>> {
        let cards = self.cards.lock().await;
        Ok(cards.iter().find(|c| c.id == id).cloned())
    }

    async fn list_cards(&self) -> Result<Vec<Card>> {
        let cards = self.cards.lock().await;
        Ok(cards.clone())
    }

    async fn card_count(&self) -> Result<u32> {
        let cards = self.cards.lock().await;
        Ok(cards.len() as u32)
    }

    async fn save_embedding(&self, id: &str, source_text: &str, vector: &[f64]) -> Result<()> {
        let mut cards = self.cards.lock().await;
        let card = cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow::anyhow!("No card with id {id}"))?;
        card.embedding = Some(vector.to_vec());
        card.embedded_text = Some(source_text.to_string());
        Ok(())
    }

    async fn save_mood(&self, id: &str, mood: Mood) -> Result<()> {
        let mut cards = self.cards.lock().await;
        let card = cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow::anyhow!("No card with id {id}"))?;
        card.mood = Some(mood);
        Ok(())
    }

    async fn replace_clusters(&self, assignments: &[(String, String)]) -> Result<()> {
        let mut cards = self.cards.lock().await;
        for card in cards.iter_mut() {
            card.cluster_id = assignments
                .iter()
                .find(|(card_id, _)| *card_id == card.id)
                .map(|(_, cluster_id)| cluster_id.clone());
        }
        Ok(())
    }
}
