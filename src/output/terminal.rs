// Colored terminal output for cards, clusters, and search results.
//
// This module handles all terminal-specific formatting; main.rs delegates
// here so command handlers stay thin.

use colored::Colorize;

use crate::store::models::{Card, ClusterSummary, SearchHit};

/// Display the board's cards as a simple list.
pub fn display_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("No cards yet. Run `kindling add <title>` to create one.");
        return;
    }

    println!("\n{}", format!("=== Board ({} cards) ===", cards.len()).bold());
    println!();

    for card in cards {
        let mood = card
            .mood
            .map(|m| format!(" [{}]", m.as_str()))
            .unwrap_or_default();
        let cluster = card
            .cluster_id
            .as_deref()
            .map(|c| format!(" ({c})"))
            .unwrap_or_default();

        println!(
            "  {:<10} {}{}{}",
            card.id.dimmed(),
            card.title.bold(),
            mood.yellow(),
            cluster.dimmed(),
        );
        if !card.description.is_empty() {
            println!("             {}", card.description.dimmed());
        }
    }
    println!();
}

/// Display a clustering run's labeled groups with their member titles.
pub fn display_clusters(summaries: &[ClusterSummary], cards: &[Card]) {
    if summaries.is_empty() {
        println!("No cards to cluster yet.");
        return;
    }

    println!(
        "\n{}",
        format!("=== {} clusters ===", summaries.len()).bold()
    );
    println!();

    for summary in summaries {
        let count = format!(
            "{} card{}",
            summary.card_count,
            if summary.card_count == 1 { "" } else { "s" }
        );
        println!(
            "  {} {} ({})",
            summary.cluster_id.dimmed(),
            summary.label.bold().bright_green(),
            count,
        );
        for id in &summary.card_ids {
            if let Some(card) = cards.iter().find(|c| &c.id == id) {
                println!("      - {}", card.title);
            }
        }
        println!();
    }
}

/// Display semantic search hits with their similarity scores.
pub fn display_search_results(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No matching cards.");
        return;
    }

    println!("\n{}", format!("=== {} matches ===", hits.len()).bold());
    println!();

    for hit in hits {
        let score = format!("{:.3}", hit.score);
        let colored_score = if hit.score >= 0.5 {
            score.bright_green()
        } else if hit.score >= 0.3 {
            score.bright_yellow()
        } else {
            score.dimmed()
        };
        println!(
            "  {}  {:<10} {}",
            colored_score,
            hit.card.id.dimmed(),
            hit.card.title.bold(),
        );
    }
    println!();
}

/// Display the generated suggestions for a card.
pub fn display_suggestions(title: &str, suggestions: &[String]) {
    println!("\n{}", format!("=== Suggestions for \"{title}\" ===").bold());
    println!();
    for suggestion in suggestions {
        println!("  - {suggestion}");
    }
    println!();
}
