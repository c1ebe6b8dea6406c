//! SQLite catalog store — the authoritative source of truth.
//!
//! The search indexes are derived caches of this database: every
//! create/update/delete here is followed by a matching index write (see
//! `catalog`), and the indexes can always be rebuilt from a full sweep.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

mod authors;
mod books;
mod types;

pub use types::*;

/// The catalog database connection and operations.
pub struct CatalogDatabase {
    pub(crate) conn: Connection,
}

impl CatalogDatabase {
    /// Open (or create) the database at the given path and initialize the
    /// schema.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        info!("Opening catalog database at: {}", path.display());

        let conn = Connection::open(path)
            .map_err(|e| anyhow!("Failed to open catalog database: {}", e))?;

        // Wait up to 5 seconds for locks held by concurrent writers.
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// In-memory database for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS books (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL,
                 description TEXT NOT NULL DEFAULT '',
                 publication_year INTEGER,
                 status TEXT NOT NULL DEFAULT 'ongoing',
                 is_published INTEGER NOT NULL DEFAULT 0,
                 added_at TEXT NOT NULL,
                 last_updated_at TEXT NOT NULL
             );

             CREATE TABLE IF NOT EXISTS authors (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 first_name TEXT,
                 last_name TEXT,
                 pseudonym TEXT,
                 display_name TEXT NOT NULL DEFAULT ''
             );

             CREATE TABLE IF NOT EXISTS book_authors (
                 book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
                 author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
                 PRIMARY KEY (book_id, author_id)
             );

             CREATE INDEX IF NOT EXISTS idx_book_authors_author
                 ON book_authors(author_id);",
        )?;
        Ok(())
    }
}
