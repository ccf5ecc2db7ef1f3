//! Store error types.

use thiserror::Error;
use vitrine_core::AdId;

/// Errors that can occur when reading or writing advertisements.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Records could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing data source does not exist.
    #[error("Data source not found: {0}")]
    NotFound(String),

    /// Two records share an id; upserts by id would be ambiguous.
    #[error("Duplicate advertisement id: {0}")]
    DuplicateId(AdId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
