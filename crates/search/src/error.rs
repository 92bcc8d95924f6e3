//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Text was missing or blank after trimming
    #[error("Text input is required")]
    EmptyInput,

    /// Matcher options out of range
    #[error("Invalid matcher options: {0}")]
    InvalidOptions(String),

    /// Vocabulary payload could not be decoded
    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),
}

impl SearchError {
    /// Whether the caller supplied bad input (as opposed to bad configuration).
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::EmptyInput | SearchError::InvalidVocabulary(_))
    }
}
