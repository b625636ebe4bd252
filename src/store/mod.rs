// Storage layer — card records with their cached embedding vectors.
//
// SQLite via rusqlite with the "bundled" feature, so there's no system
// SQLite dependency. The database file lives wherever KINDLING_DB_PATH
// points (defaults to ./kindling.db). The MemoryStore backend carries the
// same semantics for tests.

pub mod memory;
pub mod models;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(feature = "sqlite")]
use std::path::Path;

#[cfg(feature = "sqlite")]
use anyhow::{Context, Result};
#[cfg(feature = "sqlite")]
use rusqlite::Connection;

/// Open (or create) the database and run table creation.
///
/// This is the main entry point — called by `kindling init` and by any
/// command that needs board access.
#[cfg(feature = "sqlite")]
pub fn initialize(db_path: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {db_path}"))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {db_path}"))?;

    // WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;

    sqlite::create_tables(&conn)?;

    Ok(conn)
}
