//! Tantivy-backed search indexes for the catalog.
//!
//! Two structurally identical index services live here:
//! - [`BookSearchIndex`]: single-field prefix search over book titles.
//! - [`AuthorSearchIndex`]: two-field (full name / pseudonym) prefix search
//!   over author names.
//!
//! Both are derived caches of the catalog database, updated synchronously
//! after every authoritative write. Each owns its own on-disk index
//! directory and holds its `IndexWriter` open for the lifetime of the
//! process; readers are reloaded after every commit so a search issued
//! after a write observes it.

mod authors;
mod books;
pub mod error;
mod query;

#[cfg(test)]
mod tests;

pub use authors::{AuthorDocument, AuthorHit, AuthorSearchIndex};
pub use books::{BookDocument, BookSearchIndex, PaginatedBookSearch};
pub use error::{Result, SearchError};

const WRITER_HEAP_SIZE: usize = 50_000_000; // 50MB
