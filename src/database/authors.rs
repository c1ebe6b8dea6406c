// Author operations

use super::*;
use anyhow::Result;
use rusqlite::{Row, params};
use tracing::debug;

use crate::database::types::AuthorRecord;
use crate::utils::display_name_from_parts;

fn author_from_row(row: &Row<'_>) -> rusqlite::Result<AuthorRecord> {
    Ok(AuthorRecord {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        pseudonym: row.get(3)?,
        display_name: row.get(4)?,
    })
}

impl CatalogDatabase {
    /// Insert an author; the stored display name is derived from the parts.
    /// Returns the new id.
    pub fn create_author(
        &mut self,
        first_name: Option<&str>,
        last_name: Option<&str>,
        pseudonym: Option<&str>,
    ) -> Result<i64> {
        let display_name = display_name_from_parts(first_name, last_name, pseudonym);
        self.conn.execute(
            "INSERT INTO authors (first_name, last_name, pseudonym, display_name)
             VALUES (?1, ?2, ?3, ?4)",
            params![first_name, last_name, pseudonym, display_name],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Created author {id}: {display_name:?}");
        Ok(id)
    }

    /// Replace an author's names, re-deriving the display name. Returns
    /// false when no such author exists.
    pub fn update_author(
        &mut self,
        id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
        pseudonym: Option<&str>,
    ) -> Result<bool> {
        let display_name = display_name_from_parts(first_name, last_name, pseudonym);
        let updated = self.conn.execute(
            "UPDATE authors
             SET first_name = ?1, last_name = ?2, pseudonym = ?3, display_name = ?4
             WHERE id = ?5",
            params![first_name, last_name, pseudonym, display_name, id],
        )?;
        Ok(updated > 0)
    }

    /// Hard-delete an author (attributions cascade). Returns false when no
    /// such author exists.
    pub fn delete_author(&mut self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM authors WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn get_author(&self, id: i64) -> Result<Option<AuthorRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, pseudonym, display_name
             FROM authors WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], author_from_row)?;
        Ok(rows.next().transpose()?)
    }

    /// Every author row, for rebuilding the search index.
    pub fn all_authors_for_reindex(&self) -> Result<Vec<AuthorRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, pseudonym, display_name
             FROM authors ORDER BY id",
        )?;
        let rows = stmt.query_map([], author_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}
