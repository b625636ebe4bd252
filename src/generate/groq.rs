// Groq text-generation backend (OpenAI-compatible chat completions).
//
// All three operations go through one small chat() helper. Requests carry
// a client-level timeout so a stuck provider degrades instead of hanging
// a board operation; the engine converts any error here into the
// deterministic template fallback.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::traits::IdeaGenerator;
use crate::store::models::Mood;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";
const MODEL: &str = "llama-3.1-8b-instant";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GroqGenerator {
    client: Client,
    api_key: String,
    api_url: String,
}

impl GroqGenerator {
    pub fn new(api_key: String, api_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            api_url,
        })
    }

    /// One chat-completion round trip, returning the raw assistant text.
    async fn chat(&self, prompt: String, temperature: f64, max_tokens: u32) -> Result<String> {
        let request = ChatRequest {
            model: MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call text-generation provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Provider returned {}: {}", status, body);
        }

        let result: ChatResponse = response
            .json()
            .await
            .context("Failed to parse provider response")?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        debug!(chars = content.len(), "Provider response received");
        Ok(content)
    }
}

#[async_trait]
impl IdeaGenerator for GroqGenerator {
    async fn suggest(
        &self,
        title: &str,
        description: &str,
        board_context: &[String],
    ) -> Result<Vec<String>> {
        let context_text = if board_context.is_empty() {
            String::new()
        } else {
            format!(
                "\n\nExisting ideas on the board:\n- {}",
                board_context.join("\n- ")
            )
        };

        let prompt = format!(
            "You are a creative brainstorming assistant. A user just added this idea \
             to their brainstorming board:\n\n\
             Title: \"{title}\"\n\
             Description: \"{description}\"\n\
             {context_text}\n\n\
             Based on this new idea, generate 3 related and complementary suggestions \
             that would help expand on this concept. The suggestions should be:\n\
             - Directly related to \"{title}\"\n\
             - Creative and diverse\n\
             - Actionable and specific\n\
             - One per line\n\n\
             Return ONLY the 3 suggestions, one per line, without numbering, bullet \
             points, or extra formatting."
        );

        let response = self.chat(prompt, 0.8, 250).await?;
        let suggestions = parse_suggestions(&response);

        // A parseable-but-empty answer still yields usable output
        if suggestions.is_empty() {
            return Ok(vec![
                format!("Explore implementation details for {title}"),
                format!("Consider potential challenges with {title}"),
                format!("Research best practices for {title}"),
            ]);
        }
        Ok(suggestions)
    }

    async fn board_insights(&self, card_lines: &[String], total_cards: usize) -> Result<String> {
        let cards_list = card_lines.join("\n");
        let prompt = format!(
            "You are analyzing a brainstorming board with {total_cards} ideas.\n\n\
             **Cards:**\n{cards_list}\n\n\
             **Your task:** Provide a structured analysis in markdown format with \
             these exact sections:\n\n\
             ## Top Ideas\n\
             Rank the 3-5 most impactful/innovative ideas. For each, briefly explain \
             why it stands out.\n\n\
             ## Recommended Next Steps\n\
             Suggest 3-5 concrete, actionable steps to move these ideas forward. Be \
             specific.\n\n\
             ## Connections & Synergies\n\
             Identify 2-3 ways these ideas could work together or complement each \
             other.\n\n\
             Be concise and focus on actionable insights."
        );

        self.chat(prompt, 0.7, 800).await
    }

    async fn classify_mood(&self, text: &str) -> Result<Mood> {
        let prompt = format!(
            "Analyze the mood/sentiment of the following text and respond with ONLY \
             ONE WORD from this list: positive, negative, neutral, excited, thoughtful.\n\n\
             Text: \"{text}\"\n\n\
             Respond with only the mood word, nothing else."
        );

        let response = self.chat(prompt, 0.3, 10).await?;
        Ok(Mood::from_keyword(&response).unwrap_or(Mood::Neutral))
    }
}

/// Split provider output into clean suggestion lines: trim, drop empties,
/// strip any numbering or bullet prefixes the model added anyway, cap at 3.
fn parse_suggestions(response: &str) -> Vec<String> {
    let prefix = Regex::new(r"^[0-9.)*•-]+\s*").expect("valid literal regex");
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| prefix.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(3)
        .collect()
}

// --- Chat completion request/response types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
