//! Fault injection for commit failure paths.
//!
//! [`FailingStore`] behaves like an in-memory store until told to reject
//! mutations, which lets tests interrupt a commit halfway through its
//! apply phase.

use isokv_storage::{InMemoryStore, Key, KvStore, Pair, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A store that fails selected mutations.
///
/// Reads always succeed. `set` and `delete` fail with
/// [`StorageError::Backend`] when the key was registered with
/// [`fail_key`](Self::fail_key), or once the mutation budget set by
/// [`fail_after`](Self::fail_after) is spent.
#[derive(Debug)]
pub struct FailingStore<V> {
    inner: InMemoryStore<V>,
    failing_keys: Mutex<HashSet<Key>>,
    /// Remaining successful mutations; `usize::MAX` means unlimited.
    budget: AtomicUsize,
    failures: AtomicUsize,
}

impl<V> Default for FailingStore<V> {
    fn default() -> Self {
        Self {
            inner: InMemoryStore::new(),
            failing_keys: Mutex::new(HashSet::new()),
            budget: AtomicUsize::new(usize::MAX),
            failures: AtomicUsize::new(0),
        }
    }
}

impl<V> FailingStore<V> {
    /// Creates a store that does not fail yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later mutation of `key` fail.
    pub fn fail_key(&self, key: impl Into<Key>) {
        self.failing_keys.lock().insert(key.into());
    }

    /// Allows `n` more mutations, then fails every mutation.
    pub fn fail_after(&self, n: usize) {
        self.budget.store(n, Ordering::SeqCst);
    }

    /// Stops injecting failures.
    pub fn heal(&self) {
        self.failing_keys.lock().clear();
        self.budget.store(usize::MAX, Ordering::SeqCst);
    }

    /// Returns how many mutations were rejected.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn check(&self, key: &str) -> StorageResult<()> {
        let key_fails = self.failing_keys.lock().contains(key);
        let budget_spent = self
            .budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                usize::MAX => Some(usize::MAX),
                0 => None,
                n => Some(n - 1),
            })
            .is_err();

        if key_fails || budget_spent {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(StorageError::backend(format!("injected failure on {key}")));
        }
        Ok(())
    }
}

impl<V> KvStore<V> for FailingStore<V>
where
    V: Clone + Send + Sync,
{
    fn set(&self, key: Key, value: V) -> StorageResult<()> {
        self.check(&key)?;
        self.inner.set(key, value)
    }

    fn get(&self, key: &str) -> StorageResult<V> {
        self.inner.get(key)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.check(key)?;
        self.inner.delete(key)
    }

    fn range(&self, visit: &mut dyn FnMut(&str, &V) -> StorageResult<()>) -> StorageResult<()> {
        self.inner.range(visit)
    }

    fn pairs(&self) -> Vec<Pair<V>> {
        self.inner.pairs()
    }

    fn keys(&self) -> Vec<Key> {
        self.inner.keys()
    }

    fn len(&self) -> StorageResult<usize> {
        self.inner.len()
    }

    fn clear(&self) -> StorageResult<()> {
        self.inner.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isokv_core::{Config, CoreError, Database, IsolationLevel, TransactionState};
    use std::sync::Arc;

    fn setup(config: Config) -> (Arc<FailingStore<String>>, Database<String>) {
        let store = Arc::new(FailingStore::<String>::new());
        store.set("a".into(), "1".into()).unwrap();
        store.set("b".into(), "2".into()).unwrap();
        let db = Database::with_store(config, Arc::clone(&store) as Arc<dyn KvStore<String>>);
        (store, db)
    }

    #[test]
    fn fail_key_rejects_only_that_key() {
        let store = FailingStore::<u8>::new();
        store.fail_key("bad");
        assert!(store.set("ok".into(), 1).is_ok());
        assert!(matches!(
            store.set("bad".into(), 1),
            Err(StorageError::Backend(_))
        ));
        assert!(store.delete("bad").is_err());
        assert_eq!(store.failures(), 2);

        store.heal();
        assert!(store.set("bad".into(), 1).is_ok());
    }

    #[test]
    fn fail_after_spends_budget() {
        let store = FailingStore::<u8>::new();
        store.fail_after(2);
        assert!(store.set("a".into(), 1).is_ok());
        assert!(store.delete("a").is_ok());
        assert!(store.set("b".into(), 1).is_err());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn failed_commit_rolls_back_and_reports_original_error() {
        let (store, db) = setup(Config::default());
        store.fail_key("bad");

        let txn = db.begin(IsolationLevel::ReadCommitted);
        txn.set("bad", "x".to_string()).unwrap();
        let err = txn.commit().unwrap_err();

        assert!(matches!(
            err,
            CoreError::Storage(StorageError::Backend(_))
        ));
        assert_eq!(txn.state(), TransactionState::RolledBack);
        assert!(txn.commit().unwrap_err().is_inactive());
        assert_eq!(db.active_count(), 0);
    }

    #[test]
    fn failed_commit_keeps_partial_apply_by_default() {
        let (store, db) = setup(Config::default());
        store.fail_key("bad");

        let txn = db.begin(IsolationLevel::ReadCommitted);
        txn.delete("a").unwrap();
        txn.set("bad", "x".to_string()).unwrap();
        assert!(txn.commit().is_err());

        // Deletes are applied before writes and are not undone
        assert!(store.get("a").unwrap_err().is_not_found());
        assert_eq!(store.get("b").unwrap(), "2");
    }

    #[test]
    fn failed_commit_undoes_partial_apply_when_configured() {
        let (store, db) = setup(Config::new().undo_failed_commits(true));
        store.fail_key("bad");

        let txn = db.begin(IsolationLevel::Serializable);
        txn.delete("a").unwrap();
        txn.set("b", "20".to_string()).unwrap();
        txn.set("c", "30".to_string()).unwrap();
        txn.set("bad", "x".to_string()).unwrap();
        assert!(txn.commit().is_err());

        assert_eq!(store.get("a").unwrap(), "1");
        assert_eq!(store.get("b").unwrap(), "2");
        assert!(store.get("c").unwrap_err().is_not_found());
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(db.manager().serial_owner(), None);
    }

    #[test]
    fn failing_delete_aborts_before_writes() {
        let (store, db) = setup(Config::default());
        store.fail_key("a");

        let txn = db.begin(IsolationLevel::ReadCommitted);
        txn.delete("a").unwrap();
        txn.set("c", "3".to_string()).unwrap();
        assert!(txn.commit().is_err());

        assert_eq!(store.get("a").unwrap(), "1");
        assert!(store.get("c").unwrap_err().is_not_found());
    }
}
