//! Transaction manager.

use crate::config::Config;
use crate::transaction::serial::SerialLock;
use crate::transaction::state::Transaction;
use crate::types::{TransactionId, Value};
use isokv_storage::{InMemoryStore, KvStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Buffered state of one transaction, shared with the session registry.
#[derive(Debug)]
pub(crate) struct Session<V> {
    /// Pending writes.
    pub(crate) writes: InMemoryStore<V>,
    /// Pending deletes (a key set).
    pub(crate) deleted: InMemoryStore<()>,
    /// Committed values memoized by repeatable reads.
    pub(crate) snapshot: InMemoryStore<V>,
}

impl<V: Value> Session<V> {
    fn new() -> Self {
        Self {
            writes: InMemoryStore::new(),
            deleted: InMemoryStore::new(),
            snapshot: InMemoryStore::new(),
        }
    }

    /// The uncommitted value this session would expose to a dirty reader.
    fn dirty_value(&self, key: &str) -> Option<V> {
        if self.deleted.contains_key(key) {
            return None;
        }
        self.writes.lookup(key)
    }
}

/// Shared context of every transaction started from one database.
///
/// The transaction manager owns:
/// - The committed store all transactions read from and commit into
/// - The session registry consulted by read-uncommitted transactions
/// - The transaction ID counter
/// - The lock ordering serializable transactions
///
/// Transactions hold an `Arc` to their manager, so it outlives every
/// transaction it started.
pub struct TransactionManager<V: Value> {
    /// Committed state.
    committed: Arc<dyn KvStore<V>>,
    /// Active transactions by ID.
    sessions: RwLock<HashMap<TransactionId, Arc<Session<V>>>>,
    /// Last allocated transaction ID.
    last_txid: AtomicU64,
    /// Serializable ordering lock.
    serial: SerialLock,
    /// Configuration.
    config: Config,
}

impl<V: Value> TransactionManager<V> {
    /// Creates a manager committing into `committed`.
    pub fn new(config: Config, committed: Arc<dyn KvStore<V>>) -> Self {
        Self {
            committed,
            sessions: RwLock::new(HashMap::new()),
            last_txid: AtomicU64::new(0),
            serial: SerialLock::default(),
            config,
        }
    }

    /// Begins a transaction with a raw isolation code.
    ///
    /// Never fails. The code is validated lazily by the first read.
    pub fn begin(self: &Arc<Self>, isolation: u8) -> Transaction<V> {
        let id = TransactionId::new(self.last_txid.fetch_add(1, Ordering::SeqCst) + 1);
        let session = Arc::new(Session::new());

        self.sessions.write().insert(id, Arc::clone(&session));
        debug!(txid = %id, isolation, "transaction started");

        Transaction::new(id, isolation, Arc::clone(self), session)
    }

    /// Returns the committed store.
    pub(crate) fn committed(&self) -> &Arc<dyn KvStore<V>> {
        &self.committed
    }

    pub(crate) fn serial(&self) -> &SerialLock {
        &self.serial
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Removes a terminated transaction from the registry.
    pub(crate) fn deregister(&self, id: TransactionId) {
        self.sessions.write().remove(&id);
    }

    /// Finds an uncommitted value for `key` written by any active
    /// transaction other than `reader`.
    ///
    /// When several transactions hold different values, which one wins
    /// is unspecified.
    pub(crate) fn dirty_read(&self, reader: TransactionId, key: &str) -> Option<V> {
        let sessions = self.sessions.read();
        sessions
            .iter()
            .filter(|(id, _)| **id != reader)
            .find_map(|(id, session)| {
                let value = session.dirty_value(key);
                if value.is_some() {
                    trace!(reader = %reader, writer = %id, key, "dirty read");
                }
                value
            })
    }

    /// Returns the number of active transactions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Returns the IDs of active transactions, oldest first.
    #[must_use]
    pub fn active_ids(&self) -> Vec<TransactionId> {
        let mut ids: Vec<_> = self.sessions.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the transaction currently holding the serializable lock.
    #[must_use]
    pub fn serial_owner(&self) -> Option<TransactionId> {
        self.serial.owner()
    }
}

impl<V: Value> std::fmt::Debug for TransactionManager<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("last_txid", &self.last_txid.load(Ordering::SeqCst))
            .field("active_count", &self.active_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
