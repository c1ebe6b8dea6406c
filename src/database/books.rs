// Book operations

use super::*;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{Row, params};
use std::collections::HashMap;
use tracing::debug;

use crate::database::types::{AdminPanelBook, BookRecord, BookStatus, NewBook};

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<BookRecord> {
    Ok(BookRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        publication_year: row.get(3)?,
        status: BookStatus::from_str(&row.get::<_, String>(4)?),
        is_published: row.get(5)?,
        added_at: row.get(6)?,
        last_updated_at: row.get(7)?,
    })
}

impl CatalogDatabase {
    /// Insert a book and its author attributions. Returns the new id.
    pub fn create_book(&mut self, book: &NewBook) -> Result<i64> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO books
             (title, description, publication_year, status, is_published, added_at, last_updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                book.title,
                book.description,
                book.publication_year,
                book.status.as_str(),
                book.is_published,
                now,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();

        for author_id in &book.author_ids {
            tx.execute(
                "INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2)",
                params![id, author_id],
            )?;
        }

        tx.commit()?;
        debug!("Created book {id}: {:?}", book.title);
        Ok(id)
    }

    /// Replace a book's fields and attributions. Returns false when no such
    /// book exists.
    pub fn update_book(&mut self, id: i64, book: &NewBook) -> Result<bool> {
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE books
             SET title = ?1, description = ?2, publication_year = ?3, status = ?4,
                 is_published = ?5, last_updated_at = ?6
             WHERE id = ?7",
            params![
                book.title,
                book.description,
                book.publication_year,
                book.status.as_str(),
                book.is_published,
                Utc::now(),
                id,
            ],
        )?;
        if updated == 0 {
            return Ok(false);
        }

        tx.execute("DELETE FROM book_authors WHERE book_id = ?1", params![id])?;
        for author_id in &book.author_ids {
            tx.execute(
                "INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2)",
                params![id, author_id],
            )?;
        }

        tx.commit()?;
        Ok(true)
    }

    /// Hard-delete a book (attributions cascade). Returns false when no such
    /// book exists.
    pub fn delete_book(&mut self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn get_book(&self, id: i64) -> Result<Option<BookRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, publication_year, status, is_published,
                    added_at, last_updated_at
             FROM books WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], book_from_row)?;
        Ok(rows.next().transpose()?)
    }

    /// Batched fetch of admin-panel rows for the given ids, keyed by id.
    ///
    /// The map carries no ordering — callers re-walk their own ranked id
    /// list. `attributed_to` scopes the batch to books attributed to that
    /// author; ids filtered out (or deleted since the caller obtained them)
    /// are simply absent from the map.
    pub fn books_by_ids(
        &self,
        ids: &[i64],
        attributed_to: Option<i64>,
    ) -> Result<HashMap<i64, AdminPanelBook>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut sql = format!(
            "SELECT id, title, description, publication_year, status, is_published,
                    added_at, last_updated_at
             FROM books b WHERE id IN ({placeholders})"
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> =
            ids.iter().map(|id| Box::new(*id) as Box<dyn rusqlite::ToSql>).collect();

        if let Some(author_id) = attributed_to {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM book_authors ba
                              WHERE ba.book_id = b.id AND ba.author_id = ?)",
            );
            params_vec.push(Box::new(author_id));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), book_from_row)?;

        let mut result = HashMap::new();
        for row in rows {
            let record = row?;
            let panel = self.to_admin_panel_book(record)?;
            result.insert(panel.id, panel);
        }
        Ok(result)
    }

    /// Exact count of books visible under the given scope.
    pub fn count_books(&self, attributed_to: Option<i64>) -> Result<i64> {
        let count = match attributed_to {
            Some(author_id) => self.conn.query_row(
                "SELECT COUNT(*) FROM books b
                 WHERE EXISTS (SELECT 1 FROM book_authors ba
                               WHERE ba.book_id = b.id AND ba.author_id = ?1)",
                params![author_id],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// One page of admin-panel rows in id order, server-side skip/take.
    pub fn list_books_page(
        &self,
        attributed_to: Option<i64>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AdminPanelBook>> {
        let (sql, params_vec): (&str, Vec<Box<dyn rusqlite::ToSql>>) = match attributed_to {
            Some(author_id) => (
                "SELECT id, title, description, publication_year, status, is_published,
                        added_at, last_updated_at
                 FROM books b
                 WHERE EXISTS (SELECT 1 FROM book_authors ba
                               WHERE ba.book_id = b.id AND ba.author_id = ?1)
                 ORDER BY id LIMIT ?2 OFFSET ?3",
                vec![Box::new(author_id), Box::new(limit), Box::new(offset)],
            ),
            None => (
                "SELECT id, title, description, publication_year, status, is_published,
                        added_at, last_updated_at
                 FROM books ORDER BY id LIMIT ?1 OFFSET ?2",
                vec![Box::new(limit), Box::new(offset)],
            ),
        };

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), book_from_row)?;

        let mut books = Vec::new();
        for row in rows {
            books.push(self.to_admin_panel_book(row?)?);
        }
        Ok(books)
    }

    /// Every book's id and title, for rebuilding the search index.
    pub fn all_books_for_reindex(&self) -> Result<Vec<(i64, String)>> {
        let mut stmt = self.conn.prepare("SELECT id, title FROM books ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn to_admin_panel_book(&self, record: BookRecord) -> Result<AdminPanelBook> {
        let mut stmt = self.conn.prepare(
            "SELECT a.display_name FROM authors a
             JOIN book_authors ba ON ba.author_id = a.id
             WHERE ba.book_id = ?1 ORDER BY a.id",
        )?;
        let authors = stmt
            .query_map(params![record.id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(AdminPanelBook {
            id: record.id,
            title: record.title,
            authors,
            publication_year: record.publication_year,
            status: record.status,
            is_published: record.is_published,
            last_updated_at: record.last_updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book(title: &str, author_ids: Vec<i64>) -> NewBook {
        NewBook {
            title: title.to_string(),
            description: String::new(),
            publication_year: Some(1999),
            status: BookStatus::Ongoing,
            is_published: false,
            author_ids,
        }
    }

    #[test]
    fn create_and_get_book_roundtrip() {
        let mut db = CatalogDatabase::in_memory().unwrap();
        let id = db.create_book(&sample_book("The Great Escape", vec![])).unwrap();

        let book = db.get_book(id).unwrap().unwrap();
        assert_eq!(book.title, "The Great Escape");
        assert_eq!(book.publication_year, Some(1999));
        assert!(!book.is_published);
    }

    #[test]
    fn update_bumps_last_updated_and_replaces_attributions() {
        let mut db = CatalogDatabase::in_memory().unwrap();
        let a1 = db.create_author(Some("Jane"), Some("Doe"), None).unwrap();
        let a2 = db.create_author(None, None, Some("JD")).unwrap();

        let id = db.create_book(&sample_book("Echoes", vec![a1])).unwrap();
        let mut updated = sample_book("Echoes II", vec![a2]);
        updated.status = BookStatus::Completed;
        assert!(db.update_book(id, &updated).unwrap());

        let rows = db.books_by_ids(&[id], None).unwrap();
        let panel = &rows[&id];
        assert_eq!(panel.title, "Echoes II");
        assert_eq!(panel.status, BookStatus::Completed);
        assert_eq!(panel.authors, vec!["JD".to_string()]);

        // Scoped to the replaced author, the book is no longer visible.
        assert!(db.books_by_ids(&[id], Some(a1)).unwrap().is_empty());
    }

    #[test]
    fn delete_book_cascades_and_reports_missing() {
        let mut db = CatalogDatabase::in_memory().unwrap();
        let id = db.create_book(&sample_book("Gone", vec![])).unwrap();
        assert!(db.delete_book(id).unwrap());
        assert!(!db.delete_book(id).unwrap());
        assert!(db.get_book(id).unwrap().is_none());
    }

    #[test]
    fn count_and_list_respect_attribution_scope() {
        let mut db = CatalogDatabase::in_memory().unwrap();
        let author = db.create_author(Some("Jane"), Some("Doe"), None).unwrap();

        for i in 0..7 {
            let attributed = if i % 2 == 0 { vec![author] } else { vec![] };
            db.create_book(&sample_book(&format!("Book {i}"), attributed))
                .unwrap();
        }

        assert_eq!(db.count_books(None).unwrap(), 7);
        assert_eq!(db.count_books(Some(author)).unwrap(), 4);

        let page = db.list_books_page(Some(author), 0, 5).unwrap();
        assert_eq!(page.len(), 4);
        let page = db.list_books_page(None, 5, 5).unwrap();
        assert_eq!(page.len(), 2);
    }
}
