//! Error types for IsoKV core.

use crate::types::TransactionId;
use isokv_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in IsoKV core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Key is absent, or shadowed by a delete in the reading transaction.
    #[error("key not found: {key}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The transaction already committed or rolled back.
    #[error("transaction {id} is inactive")]
    TransactionInactive {
        /// The terminated transaction.
        id: TransactionId,
    },

    /// The transaction was started with an unknown isolation code.
    #[error("invalid isolation level: {code}")]
    InvalidIsolationLevel {
        /// The raw isolation code.
        code: u8,
    },

    /// Storage backend error other than a missing key.
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),
}

impl CoreError {
    /// Creates a not-found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a transaction inactive error.
    pub fn inactive(id: TransactionId) -> Self {
        Self::TransactionInactive { id }
    }

    /// Creates an invalid isolation level error.
    pub fn invalid_isolation_level(code: u8) -> Self {
        Self::InvalidIsolationLevel { code }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the transaction was already terminated.
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::TransactionInactive { .. })
    }
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { key } => Self::NotFound { key },
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_not_found_maps_to_not_found() {
        let err: CoreError = StorageError::not_found("k").into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "key not found: k");
    }

    #[test]
    fn other_storage_errors_are_wrapped() {
        let err: CoreError = StorageError::backend("boom").into();
        assert!(matches!(err, CoreError::Storage(StorageError::Backend(_))));
        assert!(!err.is_not_found());
    }

    #[test]
    fn inactive_display() {
        let err = CoreError::inactive(TransactionId::new(7));
        assert!(err.is_inactive());
        assert_eq!(err.to_string(), "transaction txn:7 is inactive");
    }
}
