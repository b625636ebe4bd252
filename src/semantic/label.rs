// Cluster label generation.
//
// A label is the two most frequent non-trivial words across a cluster's
// member texts, joined with " & " and capitalized. No provider call — the
// label must be available even when the board is offline.

use super::tokenize::STOP_WORDS;

/// Words excluded from labels on top of the embedding stop set.
const LABEL_ONLY_STOP_WORDS: &[&str] = &["your", "their"];

/// Derive a display label from a cluster's member texts.
///
/// Falls back to the first member's text truncated to 25 characters, then
/// to the literal "Group" when there is no text at all.
pub fn label_cluster(member_texts: &[String]) -> String {
    let combined = member_texts.join(" ").to_lowercase();
    let cleaned: String = combined
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    // Count qualifying words, remembering first-seen order for tie breaks
    let mut counts: Vec<(String, u32)> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() <= 3 {
            continue;
        }
        if STOP_WORDS.contains(&word) || LABEL_ONLY_STOP_WORDS.contains(&word) {
            continue;
        }
        match counts.iter_mut().find(|(w, _)| w == word) {
            Some((_, n)) => *n += 1,
            None => counts.push((word.to_string(), 1)),
        }
    }

    // Stable sort: equal counts keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let label = if counts.is_empty() {
        let fallback: String = member_texts
            .first()
            .map(|t| t.chars().take(25).collect())
            .unwrap_or_default();
        if fallback.trim().is_empty() {
            return "Group".to_string();
        }
        fallback
    } else {
        counts
            .iter()
            .take(2)
            .map(|(w, _)| w.as_str())
            .collect::<Vec<_>>()
            .join(" & ")
    };

    capitalize(&label)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
