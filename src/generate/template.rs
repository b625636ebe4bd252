// Deterministic templated generator — no provider, no network.
//
// Serves two roles: the configured backend when no API key is available,
// and the degradation target whenever the real provider fails. Output is
// plain and generic but always present, so a provider outage reads as a
// blander board, not a broken one.

use anyhow::Result;
use async_trait::async_trait;

use super::traits::IdeaGenerator;
use crate::store::models::Mood;

pub struct TemplateGenerator;

/// The fixed suggestion set used when no provider answer is available.
pub fn fallback_suggestions(title: &str) -> Vec<String> {
    vec![
        format!("Explore alternative approaches to {title}"),
        format!("Consider the user impact of {title}"),
        format!("Think about scaling {title}"),
    ]
}

#[async_trait]
impl IdeaGenerator for TemplateGenerator {
    async fn suggest(
        &self,
        title: &str,
        _description: &str,
        _board_context: &[String],
    ) -> Result<Vec<String>> {
        Ok(fallback_suggestions(title))
    }

    async fn board_insights(&self, card_lines: &[String], total_cards: usize) -> Result<String> {
        let mut insights = String::from("## Recommended Next Steps\n");
        for line in card_lines.iter().take(3) {
            insights.push_str(&format!("- Flesh out {line}\n"));
        }
        insights.push_str(&format!(
            "- Review the remaining {} ideas and pick one to prototype this week\n",
            total_cards.saturating_sub(card_lines.len().min(3))
        ));
        Ok(insights)
    }

    async fn classify_mood(&self, _text: &str) -> Result<Mood> {
        Ok(Mood::Neutral)
    }
}
