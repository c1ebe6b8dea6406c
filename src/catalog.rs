//! Write-through catalog service.
//!
//! Owns the catalog database and both search indexes, and keeps them in
//! step: the authoritative write commits first, then the matching index
//! update runs. No transaction spans the two — an index failure after the
//! store commit leaves the index behind until the next write for that id or
//! a full rebuild, and is surfaced to the caller without rolling the store
//! back.

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::database::{CatalogDatabase, NewBook};
use crate::search::{AuthorDocument, AuthorSearchIndex, BookDocument, BookSearchIndex};
use crate::utils::full_name;

const CATALOG_DB_FILE: &str = "catalog.db";
const BOOK_INDEX_DIR: &str = "book-index";
const AUTHOR_INDEX_DIR: &str = "author-index";

/// Composition root for the catalog: one database, two derived indexes.
pub struct CatalogService {
    db: CatalogDatabase,
    book_index: BookSearchIndex,
    author_index: AuthorSearchIndex,
}

impl CatalogService {
    /// Open the catalog under `data_dir`, creating anything missing.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let db = CatalogDatabase::new(data_dir.join(CATALOG_DB_FILE))?;
        let book_index = BookSearchIndex::open_or_create(&data_dir.join(BOOK_INDEX_DIR))?;
        let author_index = AuthorSearchIndex::open_or_create(&data_dir.join(AUTHOR_INDEX_DIR))?;
        Ok(Self {
            db,
            book_index,
            author_index,
        })
    }

    /// Assemble a service from already-constructed parts (tests, custom
    /// layouts).
    pub fn from_parts(
        db: CatalogDatabase,
        book_index: BookSearchIndex,
        author_index: AuthorSearchIndex,
    ) -> Self {
        Self {
            db,
            book_index,
            author_index,
        }
    }

    pub fn database(&self) -> &CatalogDatabase {
        &self.db
    }

    pub fn book_index(&self) -> &BookSearchIndex {
        &self.book_index
    }

    pub fn author_index(&self) -> &AuthorSearchIndex {
        &self.author_index
    }

    /// Create a book and index its title. Returns the new id.
    pub fn create_book(&mut self, book: &NewBook) -> Result<i64> {
        let id = self.db.create_book(book)?;
        self.index_book(id, &book.title)?;
        Ok(id)
    }

    /// Update a book and re-index its title. Returns false when no such
    /// book exists.
    pub fn update_book(&mut self, id: i64, book: &NewBook) -> Result<bool> {
        if !self.db.update_book(id, book)? {
            return Ok(false);
        }
        self.index_book(id, &book.title)?;
        Ok(true)
    }

    /// Delete a book from the store and the index.
    pub fn delete_book(&mut self, id: i64) -> Result<bool> {
        if !self.db.delete_book(id)? {
            return Ok(false);
        }
        if let Err(e) = self.book_index.remove(id) {
            warn!("Book {id} deleted from store but index removal failed: {e}");
            return Err(e.into());
        }
        Ok(true)
    }

    /// Create an author and index their names. Returns the new id.
    pub fn create_author(
        &mut self,
        first_name: Option<&str>,
        last_name: Option<&str>,
        pseudonym: Option<&str>,
    ) -> Result<i64> {
        let id = self.db.create_author(first_name, last_name, pseudonym)?;
        self.index_author(id, first_name, last_name, pseudonym)?;
        Ok(id)
    }

    /// Update an author and re-index their names.
    pub fn update_author(
        &mut self,
        id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
        pseudonym: Option<&str>,
    ) -> Result<bool> {
        if !self.db.update_author(id, first_name, last_name, pseudonym)? {
            return Ok(false);
        }
        self.index_author(id, first_name, last_name, pseudonym)?;
        Ok(true)
    }

    /// Delete an author from the store and the index.
    pub fn delete_author(&mut self, id: i64) -> Result<bool> {
        if !self.db.delete_author(id)? {
            return Ok(false);
        }
        if let Err(e) = self.author_index.remove(id) {
            warn!("Author {id} deleted from store but index removal failed: {e}");
            return Err(e.into());
        }
        Ok(true)
    }

    /// Recovery sweep: clear both indexes and replay every store record.
    ///
    /// The indexes are fully derived, so this is always safe to run; it is
    /// the repair path for a crash between a store commit and its index
    /// update.
    pub fn rebuild_search_indexes(&mut self) -> Result<()> {
        let books = self.db.all_books_for_reindex()?;
        let book_count = books.len();
        self.book_index.rebuild(
            books
                .into_iter()
                .map(|(id, title)| BookDocument { id, title }),
        )?;

        let authors = self.db.all_authors_for_reindex()?;
        let author_count = authors.len();
        self.author_index.rebuild(authors.into_iter().map(|a| AuthorDocument {
            id: a.id,
            full_name: full_name(a.first_name.as_deref(), a.last_name.as_deref()),
            pseudonym: a.pseudonym.unwrap_or_default(),
        }))?;

        info!("Rebuilt search indexes: {book_count} books, {author_count} authors");
        Ok(())
    }

    fn index_book(&self, id: i64, title: &str) -> Result<()> {
        if let Err(e) = self.book_index.add_or_update(id, title) {
            // The store write has already committed; the index falls behind
            // until the next write for this id or a rebuild sweep.
            warn!("Book {id} committed to store but indexing failed: {e}");
            return Err(e.into());
        }
        Ok(())
    }

    fn index_author(
        &self,
        id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
        pseudonym: Option<&str>,
    ) -> Result<()> {
        let name = full_name(first_name, last_name);
        if let Err(e) = self
            .author_index
            .add_or_update(id, &name, pseudonym.unwrap_or_default())
        {
            warn!("Author {id} committed to store but indexing failed: {e}");
            return Err(e.into());
        }
        Ok(())
    }
}
