use thiserror::Error;
use uuid::Uuid;

/// Error type covering ingestion, storage, and lookup failures.
///
/// The forecasting engines themselves are pure and cannot fail; invalid
/// numeric input is a caller-side precondition enforced through
/// [`crate::domain::Dataset::validate`] before the engines run.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),
    #[error("Transfer not found: {0}")]
    TransferNotFound(Uuid),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
}
