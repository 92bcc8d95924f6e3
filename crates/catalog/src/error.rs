//! Error types for the catalog crate.

use pantry_core::{Error, ErrorCode};
use pantry_search::SearchError;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No row with this id
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// Another ingredient already uses this name
    #[error("Ingredient name already exists: {0}")]
    DuplicateName(String),

    /// Row failed validation
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Matching failed
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Snapshot file could not be read or written
    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON
    #[error("Snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn ingredient_not_found(id: i64) -> Self {
        CatalogError::NotFound { kind: "ingredient", id }
    }

    pub(crate) fn sponsor_not_found(id: i64) -> Self {
        CatalogError::NotFound { kind: "sponsor", id }
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { kind, id } => Error::not_found(kind, id),
            CatalogError::DuplicateName(_) => Error::new(ErrorCode::DuplicateName, err.to_string())
                .with_suggestion("Update the existing ingredient instead of adding a new one"),
            CatalogError::InvalidRecord(_) => Error::new(ErrorCode::InvalidRecord, err.to_string()),
            CatalogError::Search(SearchError::EmptyInput) => {
                Error::invalid_input(err.to_string())
                    .with_suggestion("Provide text containing at least one word")
            }
            CatalogError::Search(SearchError::InvalidOptions(_)) => {
                Error::config_invalid(err.to_string())
            }
            CatalogError::Search(SearchError::InvalidVocabulary(_)) => {
                Error::new(ErrorCode::SnapshotError, err.to_string())
            }
            CatalogError::Io(io) => Error::from(io).with_context("While accessing the catalog snapshot"),
            CatalogError::Format(json) => Error::from(json)
                .with_suggestion("Check the catalog snapshot is valid JSON"),
        }
    }
}
