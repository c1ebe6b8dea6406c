use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Tantivy error: {0}")]
    TantivyError(#[from] tantivy::TantivyError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to open index directory: {0}")]
    OpenDirectory(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
