// DreamShelf search subsystem
//!
//! Prefix-based "search-as-you-type" lookups over book titles and author
//! names, backed by Tantivy indexes that are derived from (and kept in step
//! with) a SQLite catalog store.
//!
//! The index layer lives in [`search`], the authoritative store in
//! [`database`]. [`catalog::CatalogService`] keeps the two in step on every
//! write, and [`admin::AdminPanel`] composes them into ranked, role-filtered
//! result pages.

pub mod admin;
pub mod catalog;
pub mod database;
pub mod search;
pub mod utils;

// Re-export common types
pub use admin::{AdminBooksPage, AdminPanel, Role};
pub use catalog::CatalogService;
pub use database::{AdminPanelBook, AuthorRecord, BookRecord, BookStatus, CatalogDatabase, NewBook};
pub use search::{AuthorHit, AuthorSearchIndex, BookSearchIndex, PaginatedBookSearch};
