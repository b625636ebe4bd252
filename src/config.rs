use std::env;

use anyhow::Result;

/// Which text-generation backend to use for suggestions, summaries, and
/// mood classification.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorBackend {
    /// Groq's OpenAI-compatible chat completions — requires GROQ_API_KEY
    Groq,
    /// Deterministic templates — no API key, no network
    Template,
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file is
/// loaded automatically at startup via dotenvy. The two similarity
/// thresholds are configuration, not constants: hash embeddings score
/// lower than neural ones, and the defaults here are calibrated to the
/// hash embedder's typical score distribution.
pub struct Config {
    pub db_path: String,
    pub groq_api_key: String,
    /// Chat completions base URL (defaults to Groq's endpoint).
    pub groq_api_url: String,
    pub generator_backend: GeneratorBackend,
    /// Default similarity threshold for clustering runs.
    pub cluster_threshold: f64,
    /// Minimum similarity for a search hit.
    pub search_min_score: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; the generator backend falls back to
    /// templates when no API key is configured.
    pub fn load() -> Result<Self> {
        let groq_api_key = env::var("GROQ_API_KEY").unwrap_or_default();

        let generator_backend = match env::var("KINDLING_GENERATOR").as_deref() {
            Ok("template") => GeneratorBackend::Template,
            Ok("groq") => GeneratorBackend::Groq,
            // Unset: use the provider when a key is present
            _ if !groq_api_key.is_empty() => GeneratorBackend::Groq,
            _ => GeneratorBackend::Template,
        };

        Ok(Self {
            db_path: env::var("KINDLING_DB_PATH").unwrap_or_else(|_| "./kindling.db".to_string()),
            groq_api_key,
            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| crate::generate::groq::DEFAULT_API_URL.to_string()),
            generator_backend,
            cluster_threshold: parse_f64("KINDLING_CLUSTER_THRESHOLD", 0.3)?,
            search_min_score: parse_f64("KINDLING_SEARCH_MIN_SCORE", 0.2)?,
        })
    }

    /// Check that the Groq backend has what it needs.
    /// Call this before constructing a GroqGenerator.
    pub fn require_groq(&self) -> Result<()> {
        if self.groq_api_key.is_empty() {
            anyhow::bail!(
                "GROQ_API_KEY not set. Add it to your .env file, or set\n\
                 KINDLING_GENERATOR=template to use deterministic fallbacks."
            );
        }
        Ok(())
    }
}

fn parse_f64(var: &str, default: f64) -> Result<f64> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("{var} must be a number, got \"{value}\"")),
        Err(_) => Ok(default),
    }
}
