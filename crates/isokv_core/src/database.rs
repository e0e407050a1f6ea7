//! Database facade.

use crate::config::Config;
use crate::error::CoreResult;
use crate::transaction::{Transaction, TransactionManager};
use crate::types::{IsolationLevel, TransactionId, Value};
use isokv_storage::{InMemoryStore, KvStore};
use std::sync::Arc;

/// The main database handle.
///
/// `Database` is the entry point for IsoKV. It owns the committed store
/// and starts transactions against it. Handles are cheap to clone and
/// share one underlying database.
///
/// # Example
///
/// ```rust
/// use isokv_core::{Database, IsolationLevel};
///
/// let db: Database<String> = Database::new();
///
/// let txn = db.begin(IsolationLevel::ReadCommitted);
/// txn.set("greeting", "hello".to_string())?;
/// txn.commit()?;
///
/// let reader = db.begin(IsolationLevel::ReadCommitted);
/// assert_eq!(reader.get("greeting")?, "hello");
/// # Ok::<(), isokv_core::CoreError>(())
/// ```
///
/// # Custom Stores
///
/// Any [`KvStore`] can hold the committed state:
///
/// ```rust
/// use isokv_core::{Config, Database};
/// use isokv_storage::InMemoryStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(InMemoryStore::with_entries([("a".to_string(), 1u32)]));
/// let db: Database<u32> = Database::with_store(Config::default(), store);
/// assert_eq!(db.committed_len().unwrap(), 1);
/// ```
pub struct Database<V: Value> {
    manager: Arc<TransactionManager<V>>,
}

impl<V: Value> Database<V> {
    /// Creates an empty in-memory database with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty in-memory database.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_store(config, Arc::new(InMemoryStore::<V>::new()))
    }

    /// Creates a database whose committed state lives in `store`.
    #[must_use]
    pub fn with_store(config: Config, store: Arc<dyn KvStore<V>>) -> Self {
        Self {
            manager: Arc::new(TransactionManager::new(config, store)),
        }
    }

    /// Begins a transaction at `level`.
    ///
    /// Never fails.
    #[must_use]
    pub fn begin(&self, level: IsolationLevel) -> Transaction<V> {
        self.manager.begin(level.code())
    }

    /// Begins a transaction with a raw isolation code.
    ///
    /// Codes 1 to 4 map to the [`IsolationLevel`] variants. Any other code
    /// is accepted here and rejected with `InvalidIsolationLevel` by the
    /// transaction's first `get` or `range`.
    #[must_use]
    pub fn begin_with_code(&self, code: u8) -> Transaction<V> {
        self.manager.begin(code)
    }

    /// Runs `f` in a new transaction at `level`.
    ///
    /// Commits if `f` returns `Ok`, rolls back if it returns `Err`.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or the commit error.
    pub fn transaction<F, T>(&self, level: IsolationLevel, f: F) -> CoreResult<T>
    where
        F: FnOnce(&Transaction<V>) -> CoreResult<T>,
    {
        let txn = self.begin(level);
        match f(&txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(err) => {
                let _ = txn.rollback();
                Err(err)
            }
        }
    }

    /// Returns the number of active transactions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.manager.active_count()
    }

    /// Returns the IDs of active transactions, oldest first.
    #[must_use]
    pub fn active_ids(&self) -> Vec<TransactionId> {
        self.manager.active_ids()
    }

    /// Returns the number of committed keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot report its size.
    pub fn committed_len(&self) -> CoreResult<usize> {
        Ok(self.manager.committed().len()?)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.manager.config()
    }

    /// Returns the transaction manager.
    #[must_use]
    pub fn manager(&self) -> &Arc<TransactionManager<V>> {
        &self.manager
    }
}

impl<V: Value> Default for Database<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value> Clone for Database<V> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<V: Value> std::fmt::Debug for Database<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("manager", &self.manager)
            .finish()
    }
}
