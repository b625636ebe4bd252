// SqliteStore — rusqlite backend implementing the CardStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is
// !Send. Trait methods lock the mutex, do synchronous rusqlite work, and
// return; the lock is never held across .await points.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use super::models::{Card, Mood};
use super::traits::CardStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection (see `store::initialize`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

/// Create the cards table if it doesn't exist yet. Idempotent — safe to
/// call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS cards (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            mood TEXT,                -- provider-assigned, nullable
            cluster_id TEXT,          -- last clustering run's assignment
            embedding TEXT,           -- JSON array of floats
            embedded_text TEXT,       -- text snapshot the vector came from
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Index for collecting a cluster's members
        CREATE INDEX IF NOT EXISTS idx_cards_cluster ON cards(cluster_id);
        ",
    )
    .context("Failed to create database tables")?;
    Ok(())
}

fn row_to_card(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Card, Option<String>)> {
    let embedding_json: Option<String> = row.get(5)?;
    let mood_str: Option<String> = row.get(3)?;
    Ok((
        Card {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            mood: mood_str.as_deref().and_then(Mood::from_keyword),
            cluster_id: row.get(4)?,
            embedding: None,
            embedded_text: row.get(6)?,
            created_at: row.get(7)?,
        },
        embedding_json,
    ))
}

fn load_card(pair: (Card, Option<String>)) -> Result<Card> {
    let (mut card, embedding_json) = pair;
    if let Some(json) = embedding_json {
        card.embedding =
            Some(serde_json::from_str(&json).context("Corrupt embedding JSON in cards table")?);
    }
    Ok(card)
}

const CARD_COLUMNS: &str =
    "id, title, description, mood, cluster_id, embedding, embedded_text, created_at";

#[async_trait]
impl CardStore for SqliteStore {
    async fn add_card(&self, title: &str, description: &str) -> Result<Card> {
        let conn = self.conn.lock().await;
        // Sequential ids keep CLI usage predictable; the Mutex serializes
        // the read-then-insert.
        let next: i64 = conn.query_row(
            "SELECT COALESCE(MAX(rowid), 0) + 1 FROM cards",
            [],
            |row| row.get(0),
        )?;
        let id = format!("card-{next}");
        conn.execute(
            "INSERT INTO cards (id, title, description) VALUES (?1, ?2, ?3)",
            params![id, title, description],
        )?;
        let pair = conn.query_row(
            &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
            params![id],
            row_to_card,
        )?;
        load_card(pair)
    }

    async fn get_card(&self, id: &str) -> Result<Option<Card>> {
        let conn = self.conn.lock().await;
        let pair = conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![id],
                row_to_card,
            )
            .optional()?;
        pair.map(load_card).transpose()
    }

    async fn list_cards(&self) -> Result<Vec<Card>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY rowid"))?;
        let rows = stmt.query_map([], row_to_card)?;
        let mut cards = Vec::new();
        for pair in rows {
            cards.push(load_card(pair?)?);
        }
        Ok(cards)
    }

    async fn card_count(&self) -> Result<u32> {
        let conn = self.conn.lock().await;
        let count: u32 = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count)
    }

    async fn save_embedding(&self, id: &str, source_text: &str, vector: &[f64]) -> Result<()> {
        let json = serde_json::to_string(vector)?;
        let conn = self.conn.lock().await;
        let updated = conn.execute(
            "UPDATE cards SET embedding = ?1, embedded_text = ?2 WHERE id = ?3",
            params![json, source_text, id],
        )?;
        if updated == 0 {
            anyhow::bail!("No card with id {id}");
        }
        Ok(())
    }

    async fn save_mood(&self, id: &str, mood: Mood) -> Result<()> {
        let conn = self.conn.lock().await;
        let updated = conn.execute(
            "UPDATE cards SET mood = ?1 WHERE id = ?2",
            params![mood.as_str(), id],
        )?;
        if updated == 0 {
            anyhow::bail!("No card with id {id}");
        }
        Ok(())
    }

    async fn replace_clusters(&self, assignments: &[(String, String)]) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute("UPDATE cards SET cluster_id = NULL", [])?;
        for (card_id, cluster_id) in assignments {
            tx.execute(
                "UPDATE cards SET cluster_id = ?1 WHERE id = ?2",
                params![cluster_id, card_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn)
    }

    #[tokio::test]
    async fn test_add_and_get_card() {
        let store = open_store().await;
        let card = store.add_card("Solar roof", "panels on the office").await.unwrap();
        assert_eq!(card.id, "card-1");

        let fetched = store.get_card(&card.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Solar roof");
        assert!(fetched.embedding.is_none());
    }

    #[tokio::test]
    async fn test_embedding_round_trip() {
        let store = open_store().await;
        let card = store.add_card("Solar roof", "").await.unwrap();
        let vector = vec![0.25, -0.5, 0.75];
        store
            .save_embedding(&card.id, "Solar roof ", &vector)
            .await
            .unwrap();

        let fetched = store.get_card(&card.id).await.unwrap().unwrap();
        assert_eq!(fetched.embedding.as_deref(), Some(vector.as_slice()));
        assert_eq!(fetched.embedded_text.as_deref(), Some("Solar roof "));
    }

    #[tokio::test]
    async fn test_replace_clusters_clears_old_assignments() {
        let store = open_store().await;
        let a = store.add_card("A", "").await.unwrap();
        let b = store.add_card("B", "").await.unwrap();

        store
            .replace_clusters(&[
                (a.id.clone(), "cluster-0".to_string()),
                (b.id.clone(), "cluster-0".to_string()),
            ])
            .await
            .unwrap();

        // Second run assigns only A — B's old assignment must be gone
        store
            .replace_clusters(&[(a.id.clone(), "cluster-0".to_string())])
            .await
            .unwrap();

        let b_after = store.get_card(&b.id).await.unwrap().unwrap();
        assert!(b_after.cluster_id.is_none());
    }

    #[tokio::test]
    async fn test_save_mood() {
        let store = open_store().await;
        let card = store.add_card("A", "").await.unwrap();
        store.save_mood(&card.id, Mood::Excited).await.unwrap();
        let fetched = store.get_card(&card.id).await.unwrap().unwrap();
        assert_eq!(fetched.mood, Some(Mood::Excited));
    }

    #[tokio::test]
    async fn test_unknown_card_errors() {
        let store = open_store().await;
        assert!(store.save_mood("card-99", Mood::Neutral).await.is_err());
        assert!(store.get_card("card-99").await.unwrap().is_none());
    }
}
