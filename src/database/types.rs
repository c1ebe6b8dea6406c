//! Row types for the catalog database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication lifecycle of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Ongoing,
    Completed,
    Abandoned,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Ongoing => "ongoing",
            BookStatus::Completed => "completed",
            BookStatus::Abandoned => "abandoned",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "completed" => BookStatus::Completed,
            "abandoned" => BookStatus::Abandoned,
            _ => BookStatus::Ongoing,
        }
    }
}

/// A book row as stored.
#[derive(Debug, Clone, Serialize)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub publication_year: Option<i32>,
    pub status: BookStatus,
    pub is_published: bool,
    pub added_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

/// Fields for creating or replacing a book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub publication_year: Option<i32>,
    pub status: BookStatus,
    pub is_published: bool,
    pub author_ids: Vec<i64>,
}

/// An author row as stored.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorRecord {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub pseudonym: Option<String>,
    pub display_name: String,
}

/// A book as rendered in the admin panel, with attributed author display
/// names resolved.
#[derive(Debug, Clone, Serialize)]
pub struct AdminPanelBook {
    pub id: i64,
    pub title: String,
    pub authors: Vec<String>,
    pub publication_year: Option<i32>,
    pub status: BookStatus,
    pub is_published: bool,
    pub last_updated_at: DateTime<Utc>,
}
