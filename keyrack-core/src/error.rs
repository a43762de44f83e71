//! Error types for key-value operations.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type KvResult<T> = Result<T, KvError>;

/// Errors that can occur in key-value operations.
///
/// Two failure classes are deliberately *not* errors: a primitive value that
/// fails to parse resolves to the caller's default, and a missing key
/// resolves to the caller's default (or a no-op on delete).
#[derive(Debug, Error)]
pub enum KvError {
    /// A stored type tag could not be resolved to any registered type.
    #[error("no type registered for stored tag `{tag}` (key `{key}`)")]
    UnknownTag { key: String, tag: String },

    /// A value was stored under one type but requested as an incompatible one.
    #[error("key `{key}` was stored as `{stored}` but requested as `{requested}`")]
    TypeMismatch {
        key: String,
        stored: String,
        requested: String,
    },

    /// An object write or view registration named a type the registry does
    /// not know.
    #[error("type `{type_name}` is not registered")]
    UnregisteredType { type_name: &'static str },

    /// An object write produced a null document. A null carries no concrete
    /// type to tag the entry with; clearing a key is done by deleting it.
    #[error("value for key `{key}` encodes to null; delete the key instead")]
    NullEncoding { key: String },

    /// Object document encode/decode failure.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Failure reported by the backing session.
    #[error("session error: {0}")]
    Session(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl KvError {
    /// Wraps a backend error crossing the
    /// [`DocumentSession`](crate::DocumentSession) seam.
    pub fn session(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Session(Box::new(err))
    }
}
