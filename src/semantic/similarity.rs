// Cosine similarity between embedding vectors.
//
// The one scoring primitive everything else (clustering, search) is built
// on. Malformed-but-well-typed input never errors: mismatched dimensions
// and zero-magnitude vectors score 0.0, so the all-zero "no signal"
// embedding is similar to nothing, including itself.

/// Cosine similarity in [-1, 1]. Returns 0.0 when the vectors have
/// different lengths or either has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Euclidean norm. Clustering uses this to pick the highest-energy vector
/// as each cluster's seed.
pub fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
