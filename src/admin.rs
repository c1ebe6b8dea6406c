//! Admin panel book listing: search-ranked and plain paginated views.
//!
//! Composes the book title index with the catalog store. The index supplies
//! ranked ids; the store supplies the rows and enforces row-level
//! visibility. Ids the store does not return — filtered out by role, or
//! deleted after the index was queried — are silently skipped, which is how
//! the panel tolerates the index briefly lagging the store.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::database::{AdminPanelBook, CatalogDatabase};
use crate::search::BookSearchIndex;

const MAX_PAGE_SIZE: i64 = 5;

/// Caller role for row-level visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Sees every book.
    Admin,
    /// Sees only books they are attributed to.
    Author,
}

/// One page of admin panel results.
#[derive(Debug, Default, Clone, Serialize)]
pub struct AdminBooksPage {
    pub books: Vec<AdminPanelBook>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Façade over the book index and the catalog store.
pub struct AdminPanel<'a> {
    db: &'a CatalogDatabase,
    index: &'a BookSearchIndex,
}

impl<'a> AdminPanel<'a> {
    pub fn new(db: &'a CatalogDatabase, index: &'a BookSearchIndex) -> Self {
        Self { db, index }
    }

    /// Search-ranked page: index first, then one batched store fetch,
    /// merged back in rank order.
    ///
    /// Pagination flags come from the index unmodified, so `has_next_page`
    /// keeps the index's reached-the-ceiling heuristic.
    pub fn search_books(
        &self,
        term: &str,
        role: Role,
        author_id: i64,
        page: usize,
    ) -> Result<AdminBooksPage> {
        let ranked = self.index.paginated_search(term, page)?;
        if ranked.ids.is_empty() {
            return Ok(AdminBooksPage::default());
        }

        let scope = attribution_scope(role, author_id);
        let batch = self.db.books_by_ids(&ranked.ids, scope)?;

        // Re-walk the ranked list, not the batch: the batch has arbitrary
        // internal order and may be missing filtered or deleted ids.
        let mut books = Vec::with_capacity(batch.len());
        for id in &ranked.ids {
            if let Some(book) = batch.get(id) {
                books.push(book.clone());
            } else {
                debug!("Dropping stale or filtered book id {id} from search results");
            }
        }

        Ok(AdminBooksPage {
            books,
            has_next_page: ranked.has_next_page,
            has_previous_page: ranked.has_previous_page,
        })
    }

    /// Plain listing (no search term): server-side skip/take over the store
    /// with an exact row count, no index involvement.
    ///
    /// Returns `None` when `page` is past the last page (including when
    /// there are no rows at all).
    pub fn get_books(&self, role: Role, author_id: i64, page: usize) -> Result<Option<AdminBooksPage>> {
        let page = page.max(1) as i64;
        let scope = attribution_scope(role, author_id);

        let count = self.db.count_books(scope)?;
        let page_count = (count + MAX_PAGE_SIZE - 1) / MAX_PAGE_SIZE;
        if page > page_count {
            return Ok(None);
        }

        let offset = (page - 1) * MAX_PAGE_SIZE;
        let books = self.db.list_books_page(scope, offset, MAX_PAGE_SIZE)?;

        Ok(Some(AdminBooksPage {
            books,
            has_next_page: page != page_count,
            has_previous_page: page > 1,
        }))
    }
}

fn attribution_scope(role: Role, author_id: i64) -> Option<i64> {
    match role {
        Role::Admin => None,
        Role::Author => Some(author_id),
    }
}
