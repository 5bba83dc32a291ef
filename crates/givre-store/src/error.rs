use thiserror::Error;

/// Errors produced by the store layer.
///
/// None of these escape [`crate::RecordStore`]'s public operations: the store
/// recovers by degrading to a volatile in-memory backend and logging.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error from the file backend.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The record collection could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
