// Greedy single-linkage clustering over (id, vector) pairs.
//
// One pass, no re-clustering: items are visited in descending vector
// magnitude so the most distinctive vector seeds each cluster, and every
// unprocessed item similar enough to the seed joins it. This is
// intentionally not full hierarchical agglomerative clustering — callers
// wanting coarser or finer groups adjust the threshold, not the algorithm.

use std::collections::HashMap;

use tracing::debug;

use super::similarity::{cosine_similarity, magnitude};

/// Partition items into clusters keyed `cluster-0`, `cluster-1`, ... in
/// seed order. Every input id lands in exactly one cluster; items with no
/// sufficiently similar neighbor form singletons.
///
/// Ordering is deterministic: seeds are chosen by descending magnitude
/// (ties by input order), and members join by descending similarity to
/// the seed (ties by input order).
pub fn cluster_vectors(
    items: &[(String, Vec<f64>)],
    threshold: f64,
) -> HashMap<String, Vec<String>> {
    let mut clusters: HashMap<String, Vec<String>> = HashMap::new();
    if items.is_empty() {
        return clusters;
    }

    debug!(
        items = items.len(),
        threshold = threshold,
        "Starting clustering pass"
    );

    // Visit order: highest-magnitude vector first. Stable sort keeps the
    // original input order for equal magnitudes.
    let mut order: Vec<usize> = (0..items.len()).collect();
    let magnitudes: Vec<f64> = items.iter().map(|(_, v)| magnitude(v)).collect();
    order.sort_by(|&a, &b| {
        magnitudes[b]
            .partial_cmp(&magnitudes[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut processed = vec![false; items.len()];
    let mut cluster_index = 0usize;

    for &seed_idx in &order {
        if processed[seed_idx] {
            continue;
        }

        let (seed_id, seed_vector) = &items[seed_idx];
        let key = format!("cluster-{cluster_index}");
        let mut members = vec![seed_id.clone()];
        processed[seed_idx] = true;

        // Scan the remaining items in input order, keep everything at or
        // above the threshold, then admit by descending similarity.
        let mut candidates: Vec<(usize, f64)> = Vec::new();
        for (other_idx, (_, other_vector)) in items.iter().enumerate() {
            if processed[other_idx] {
                continue;
            }
            let score = cosine_similarity(seed_vector, other_vector);
            if score >= threshold {
                candidates.push((other_idx, score));
            }
        }
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (other_idx, score) in candidates {
            members.push(items[other_idx].0.clone());
            processed[other_idx] = true;
            debug!(
                id = %items[other_idx].0,
                cluster = %key,
                score = format!("{score:.3}").as_str(),
                "Joined cluster"
            );
        }

        clusters.insert(key, members);
        cluster_index += 1;
    }

    debug!(clusters = cluster_index, "Clustering pass complete");
    clusters
}
