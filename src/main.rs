use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use tracing::info;

use kindling::config::{Config, GeneratorBackend};
use kindling::engine::BoardEngine;
use kindling::generate::groq::GroqGenerator;
use kindling::generate::template::TemplateGenerator;
use kindling::generate::traits::IdeaGenerator;
use kindling::output::terminal;
use kindling::semantic::traits::HashEmbedder;
use kindling::store::traits::CardStore;

/// Kindling: semantic engine for collaborative idea boards.
///
/// Cards are embedded deterministically, compared by cosine similarity,
/// and grouped into labeled clusters — no model files or API key needed.
/// Suggestions, summaries, and mood classification use a text-generation
/// provider when one is configured, with deterministic fallbacks.
#[derive(Parser)]
#[command(name = "kindling", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the board database
    Init,

    /// Add a card to the board
    Add {
        /// The card's title
        title: String,

        /// Longer description of the idea
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List all cards with their moods and cluster assignments
    List,

    /// Refresh embeddings for cards whose text changed
    Embed,

    /// Group cards into labeled clusters by semantic similarity
    Cluster {
        /// Similarity threshold in (0, 1]; lower merges more aggressively
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Search cards by meaning rather than exact words
    Search {
        /// The query text
        query: String,

        /// Minimum similarity for a hit
        #[arg(long)]
        min_score: Option<f64>,

        /// Maximum number of results
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Generate complementary suggestions for an existing card
    Suggest {
        /// The card to expand on (e.g. card-3)
        card_id: String,
    },

    /// Build a board summary: themes, mood, clusters, and next steps
    Summarize,

    /// Classify and store a card's mood
    Mood {
        /// The card to classify
        card_id: String,
    },

    /// Show board status (card counts, embeddings, clusters)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kindling=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    if let Commands::Init = cli.command {
        let _store = open_store(&config)?;
        println!("Board database initialized at: {}", config.db_path);
        return Ok(());
    }

    let store = open_store(&config)?;
    let generator = build_generator(&config)?;
    let engine = BoardEngine::new(
        Arc::clone(&store),
        Arc::new(HashEmbedder),
        generator,
    );

    match cli.command {
        Commands::Init => unreachable!("handled above"),

        Commands::Add { title, description } => {
            let card = store.add_card(&title, &description).await?;
            // Embed right away so the card is immediately searchable
            engine.ensure_embeddings().await?;
            println!("Added {} \"{}\"", card.id, card.title);
        }

        Commands::List => {
            let cards = store.list_cards().await?;
            terminal::display_cards(&cards);
        }

        Commands::Embed => {
            let pb = ProgressBar::new_spinner();
            pb.set_message("Refreshing embeddings...");
            pb.enable_steady_tick(Duration::from_millis(100));
            let refreshed = engine.ensure_embeddings().await?;
            pb.finish_and_clear();
            println!("Refreshed {refreshed} card embeddings.");
        }

        Commands::Cluster { threshold } => {
            let threshold = threshold.unwrap_or(config.cluster_threshold);
            info!(threshold = threshold, "Clustering board");
            let summaries = engine.cluster_board(threshold).await?;
            let cards = store.list_cards().await?;
            terminal::display_clusters(&summaries, &cards);
        }

        Commands::Search {
            query,
            min_score,
            top,
        } => {
            let min_score = min_score.unwrap_or(config.search_min_score);
            let hits = engine.search(&query, min_score, top).await?;
            terminal::display_search_results(&hits);
        }

        Commands::Suggest { card_id } => {
            let card = store
                .get_card(&card_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("No card with id {card_id}"))?;
            let suggestions = engine.suggest(&card_id).await?;
            terminal::display_suggestions(&card.title, &suggestions);
        }

        Commands::Summarize => {
            let summary = engine.summarize().await?;
            println!("\n{summary}\n");
        }

        Commands::Mood { card_id } => {
            let mood = engine.classify_mood(&card_id).await?;
            println!("{card_id}: {} {}", mood.emoji(), mood.as_str());
        }

        Commands::Status => {
            let cards = store.list_cards().await?;
            let embedded = cards.iter().filter(|c| c.embedding_is_fresh()).count();
            let clustered = cards.iter().filter(|c| c.cluster_id.is_some()).count();
            let with_mood = cards.iter().filter(|c| c.mood.is_some()).count();
            let backend = match config.generator_backend {
                GeneratorBackend::Groq => "groq",
                GeneratorBackend::Template => "template",
            };

            println!("Database:        {}", config.db_path);
            println!("Cards:           {}", cards.len());
            println!("Fresh vectors:   {embedded}");
            println!("Clustered:       {clustered}");
            println!("With mood:       {with_mood}");
            println!("Generator:       {backend}");
        }
    }

    Ok(())
}

#[cfg(feature = "sqlite")]
fn open_store(config: &Config) -> Result<Arc<dyn CardStore>> {
    let conn = kindling::store::initialize(&config.db_path)?;
    Ok(Arc::new(kindling::store::sqlite::SqliteStore::new(conn)))
}

#[cfg(not(feature = "sqlite"))]
fn open_store(_config: &Config) -> Result<Arc<dyn CardStore>> {
    anyhow::bail!("This build has no storage backend — rebuild with the `sqlite` feature")
}

fn build_generator(config: &Config) -> Result<Arc<dyn IdeaGenerator>> {
    match config.generator_backend {
        GeneratorBackend::Groq => {
            config.require_groq()?;
            Ok(Arc::new(GroqGenerator::new(
                config.groq_api_key.clone(),
                config.groq_api_url.clone(),
            )?))
        }
        GeneratorBackend::Template => Ok(Arc::new(TemplateGenerator)),
    }
}
