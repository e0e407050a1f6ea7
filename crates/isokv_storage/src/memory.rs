//! In-memory key-value store.

use crate::error::{StorageError, StorageResult};
use crate::pair::{Key, Pair};
use crate::store::KvStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory key-value store.
///
/// This store keeps all data in a hash map and is suitable for:
/// - The committed state of an ephemeral database
/// - Per-transaction write buffers and snapshot caches
/// - Unit and integration tests
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads. `range`
/// visits a point-in-time copy, so the visitor may call back into the store.
///
/// # Example
///
/// ```rust
/// use isokv_storage::{KvStore, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// store.set("a".to_string(), 1).unwrap();
/// store.set("a".to_string(), 2).unwrap();
/// assert_eq!(store.get("a").unwrap(), 2);
/// assert_eq!(store.len().unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryStore<V> {
    data: RwLock<HashMap<Key, V>>,
}

impl<V> Default for InMemoryStore<V> {
    fn default() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> InMemoryStore<V> {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    ///
    /// Later duplicates overwrite earlier ones.
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Key, V)>,
    {
        Self {
            data: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Removes `key` and returns its value, if any.
    pub fn take(&self, key: &str) -> Option<V> {
        self.data.write().remove(key)
    }
}

impl<V: Clone> InMemoryStore<V> {
    /// Returns a copy of the value under `key`, or `None` when absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<V> {
        self.data.read().get(key).cloned()
    }
}

impl<V> KvStore<V> for InMemoryStore<V>
where
    V: Clone + Send + Sync,
{
    fn set(&self, key: Key, value: V) -> StorageResult<()> {
        self.data.write().insert(key, value);
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<V> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn range(&self, visit: &mut dyn FnMut(&str, &V) -> StorageResult<()>) -> StorageResult<()> {
        // Copy out first so the lock is not held while user code runs
        let entries: Vec<(Key, V)> = self
            .data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (key, value) in &entries {
            visit(key, value)?;
        }
        Ok(())
    }

    fn pairs(&self) -> Vec<Pair<V>> {
        self.data
            .read()
            .iter()
            .map(|(k, v)| Pair::new(k.clone(), v.clone()))
            .collect()
    }

    fn keys(&self) -> Vec<Key> {
        self.data.read().keys().cloned().collect()
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.data.read().len())
    }

    fn clear(&self) -> StorageResult<()> {
        self.data.write().clear();
        Ok(())
    }
}
