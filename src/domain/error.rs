use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The query vector is empty or holds non-finite values.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
