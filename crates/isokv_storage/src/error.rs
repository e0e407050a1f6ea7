//! Error types for storage operations.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is not present in the store.
    #[error("key not found: {key}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// A visitor passed to [`crate::KvStore::range`] stopped iteration.
    #[error("range visitor failed: {0}")]
    Visitor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The backend failed to carry out an operation.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Creates a not-found error for `key`.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Wraps an arbitrary error raised by a range visitor.
    pub fn visitor<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Visitor(Box::new(err))
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
