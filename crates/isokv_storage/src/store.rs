//! Key-value store trait definition.

use crate::error::StorageResult;
use crate::pair::{Key, Pair};

/// A key-value store used by IsoKV.
///
/// Stores are **plain maps**. They provide point operations and whole-store
/// iteration. IsoKV owns all transaction semantics - stores do not understand
/// isolation levels, pending writes, or sessions.
///
/// # Invariants
///
/// - `set` overwrites silently and never fails on an existing key
/// - `get` returns [`crate::StorageError::NotFound`] for an absent key
/// - `delete` of an absent key succeeds without effect
/// - `clear` leaves the store empty
/// - Iteration order is unspecified
/// - Stores must be `Send + Sync`; every method takes `&self`, so
///   implementations synchronize internally
///
/// No atomicity is promised across calls. What a `range` observes while the
/// store is mutated from another thread is up to the implementation.
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - Hash map behind a read-write lock
pub trait KvStore<V>: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot accept the write.
    fn set(&self, key: Key, value: V) -> StorageResult<()>;

    /// Returns a copy of the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is absent.
    fn get(&self, key: &str) -> StorageResult<V>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot apply the removal.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Calls `visit` for every entry until it returns an error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `visit`.
    fn range(&self, visit: &mut dyn FnMut(&str, &V) -> StorageResult<()>) -> StorageResult<()>;

    /// Returns every entry as an unordered list of pairs.
    fn pairs(&self) -> Vec<Pair<V>>;

    /// Returns every key in unspecified order.
    fn keys(&self) -> Vec<Key>;

    /// Returns the number of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn len(&self) -> StorageResult<usize>;

    /// Returns true if the store holds no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be cleared.
    fn clear(&self) -> StorageResult<()>;
}
