// Embedder trait — the swap-ready abstraction over embedding sources.
//
// The default implementation is the deterministic hash embedder, which is
// pure and needs no network. A real external embedding provider can slot
// in behind the same trait (async, because providers mean HTTP calls)
// without touching the similarity scorer or the cluster engine — they
// only require a fixed-dimension vector per text.

use anyhow::Result;
use async_trait::async_trait;

use super::embed::embed_text;

/// Trait for turning text into a fixed-dimension embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;

    /// Embed multiple texts, returning vectors in the same order.
    /// Providers with batch endpoints can override this.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

/// The default embedder: deterministic feature hashing, no model files,
/// no API key. Identical text always produces a bit-identical vector.
pub struct HashEmbedder;

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        Ok(embed_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::embed::EMBEDDING_DIM;

    #[tokio::test]
    async fn test_hash_embedder_matches_pure_function() {
        let embedder = HashEmbedder;
        let via_trait = embedder.embed("urban rooftop farming").await.unwrap();
        assert_eq!(via_trait, embed_text("urban rooftop farming"));
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let embedder = HashEmbedder;
        let texts = vec!["solar energy".to_string(), "tax filing".to_string()];
        let vectors = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], embed_text("solar energy"));
        assert_eq!(vectors[1], embed_text("tax filing"));
        assert_eq!(vectors[0].len(), EMBEDDING_DIM);
    }
}
