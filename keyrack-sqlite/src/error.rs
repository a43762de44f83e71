//! Error types for the SQLite backing store.

use thiserror::Error;

/// Result type for SQLite store operations.
pub type SqliteStoreResult<T> = Result<T, SqliteStoreError>;

/// Errors that can occur in the SQLite backing store.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row could not be interpreted.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
