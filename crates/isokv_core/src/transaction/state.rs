//! Transaction state.

use crate::error::{CoreError, CoreResult};
use crate::transaction::manager::{Session, TransactionManager};
use crate::types::{IsolationLevel, TransactionId, Value};
use isokv_storage::{Key, KvStore, Pair};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// State of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is active and can perform operations.
    Active,
    /// Transaction has been committed.
    Committed,
    /// Transaction has been rolled back.
    RolledBack,
}

/// An active transaction.
///
/// Writes and deletes are buffered until [`commit`](Self::commit). Reads
/// see the transaction's own buffered state first and otherwise follow
/// its isolation level:
///
/// | Level | Source of a read |
/// |-------|------------------|
/// | `ReadUncommitted` | another active transaction's pending write, else committed |
/// | `ReadCommitted` | committed store |
/// | `RepeatableRead` | first committed value read, memoized |
/// | `Serializable` | as `RepeatableRead`, under the serializable lock |
///
/// A transaction ends with exactly one successful `commit` or `rollback`.
/// Every later call fails with [`CoreError::TransactionInactive`].
/// Dropping an active transaction rolls it back.
pub struct Transaction<V: Value> {
    /// Transaction ID.
    id: TransactionId,
    /// Raw isolation code, validated on read.
    isolation: u8,
    /// Shared database context.
    manager: Arc<TransactionManager<V>>,
    /// Buffers, also visible to dirty readers through the registry.
    session: Arc<Session<V>>,
    /// Current state; the lock serializes commit and rollback.
    state: Mutex<TransactionState>,
}

/// Prior committed values of keys touched by a commit in progress.
struct UndoLog<V> {
    entries: Vec<(Key, Option<V>)>,
}

impl<V: Value> UndoLog<V> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn record(&mut self, store: &dyn KvStore<V>, key: &str) -> CoreResult<()> {
        let prior = match store.get(key) {
            Ok(value) => Some(value),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err.into()),
        };
        self.entries.push((key.to_string(), prior));
        Ok(())
    }

    /// Restores recorded values, newest first. Best effort.
    fn restore(self, store: &dyn KvStore<V>) {
        for (key, prior) in self.entries.into_iter().rev() {
            let _ = match prior {
                Some(value) => store.set(key, value),
                None => store.delete(&key),
            };
        }
    }
}

impl<V: Value> Transaction<V> {
    pub(crate) fn new(
        id: TransactionId,
        isolation: u8,
        manager: Arc<TransactionManager<V>>,
        session: Arc<Session<V>>,
    ) -> Self {
        Self {
            id,
            isolation,
            manager,
            session,
            state: Mutex::new(TransactionState::Active),
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the raw isolation code the transaction was started with.
    #[must_use]
    pub fn isolation_code(&self) -> u8 {
        self.isolation
    }

    /// Returns the isolation level.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIsolationLevel` if the transaction was started with
    /// an unknown code.
    pub fn isolation(&self) -> CoreResult<IsolationLevel> {
        IsolationLevel::try_from(self.isolation)
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        *self.state.lock()
    }

    /// Checks if the transaction is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state() == TransactionState::Active
    }

    /// Returns the number of buffered writes.
    pub fn pending_write_count(&self) -> CoreResult<usize> {
        Ok(self.session.writes.len()?)
    }

    /// Returns the number of buffered deletes.
    pub fn pending_delete_count(&self) -> CoreResult<usize> {
        Ok(self.session.deleted.len()?)
    }

    /// Commits the transaction.
    ///
    /// Recorded deletes are applied to the committed store first, then
    /// buffered writes. A serializable transaction holds the serializable
    /// lock while applying.
    ///
    /// If applying fails the transaction is rolled back and the original
    /// error is returned. Mutations applied before the failure stay in the
    /// committed store unless [`crate::Config::undo_failed_commits`] is set.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended, or
    /// the storage error that interrupted the apply.
    pub fn commit(&self) -> CoreResult<()> {
        let mut state = self.state.lock();
        self.check_active(*state)?;

        if self.isolation == IsolationLevel::Serializable.code() {
            self.manager.serial().acquire(self.id);
        }

        if let Err(err) = self.apply() {
            warn!(txid = %self.id, error = %err, "commit failed, rolling back");
            self.finish(&mut state, TransactionState::RolledBack);
            return Err(err);
        }

        self.finish(&mut state, TransactionState::Committed);
        Ok(())
    }

    /// Rolls the transaction back, discarding every buffered change.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended.
    pub fn rollback(&self) -> CoreResult<()> {
        let mut state = self.state.lock();
        self.check_active(*state)?;
        self.finish(&mut state, TransactionState::RolledBack);
        Ok(())
    }

    /// Buffers a write of `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended.
    pub fn set(&self, key: impl Into<Key>, value: V) -> CoreResult<()> {
        self.ensure_active()?;
        self.session.writes.set(key.into(), value)?;
        Ok(())
    }

    /// Records a delete of `key` and drops any buffered write for it.
    ///
    /// Until the transaction ends, `get(key)` reports `NotFound`, even
    /// after a later `set`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended.
    pub fn delete(&self, key: &str) -> CoreResult<()> {
        self.ensure_active()?;
        self.session.deleted.set(key.to_string(), ())?;
        self.session.writes.delete(key)?;
        Ok(())
    }

    /// Reads `key`.
    ///
    /// # Errors
    ///
    /// - `TransactionInactive` if the transaction already ended
    /// - `NotFound` if the key is deleted in this transaction or absent
    /// - `InvalidIsolationLevel` if started with an unknown code
    pub fn get(&self, key: &str) -> CoreResult<V> {
        self.ensure_active()?;

        if self.session.deleted.contains_key(key) {
            return Err(CoreError::not_found(key));
        }
        if let Some(value) = self.session.writes.lookup(key) {
            return Ok(value);
        }

        self.resolve(key, None)
    }

    /// Visits every committed key with the value this transaction sees.
    ///
    /// Only keys in the committed store are visited: this transaction's
    /// own buffered writes and deletes are not applied. Each value is
    /// resolved with the isolation rules of [`get`](Self::get), so
    /// repeatable reads memoize what they visit.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` or `InvalidIsolationLevel` (converted
    /// into `E`), or the first error returned by `visit`.
    pub fn range<F, E>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&str, &V) -> Result<(), E>,
        E: From<CoreError>,
    {
        self.ensure_active()?;
        self.isolation()?;

        for pair in self.manager.committed().pairs() {
            let value = self.resolve(pair.key(), Some(pair.value()))?;
            visit(pair.key(), &value)?;
        }
        Ok(())
    }

    /// Returns every committed pair, ignoring isolation and buffers.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended.
    pub fn pairs(&self) -> CoreResult<Vec<Pair<V>>> {
        self.ensure_active()?;
        Ok(self.manager.committed().pairs())
    }

    /// Returns every committed key, ignoring isolation and buffers.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended.
    pub fn keys(&self) -> CoreResult<Vec<Key>> {
        self.ensure_active()?;
        Ok(self.manager.committed().keys())
    }

    /// Returns the number of committed keys, ignoring isolation and buffers.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended.
    pub fn len(&self) -> CoreResult<usize> {
        self.ensure_active()?;
        Ok(self.manager.committed().len()?)
    }

    /// Returns true if the committed store is empty.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Discards this transaction's buffered writes, deletes and memoized
    /// reads. The committed store is untouched.
    ///
    /// # Errors
    ///
    /// Returns `TransactionInactive` if the transaction already ended.
    pub fn clear(&self) -> CoreResult<()> {
        self.ensure_active()?;
        self.clear_buffers();
        Ok(())
    }

    /// Applies deletes then writes to the committed store.
    fn apply(&self) -> CoreResult<()> {
        if !self.manager.config().undo_failed_commits {
            return self.apply_with(None);
        }

        let mut undo = UndoLog::new();
        let result = self.apply_with(Some(&mut undo));
        if result.is_err() {
            undo.restore(self.manager.committed().as_ref());
        }
        result
    }

    fn apply_with(&self, mut undo: Option<&mut UndoLog<V>>) -> CoreResult<()> {
        let committed = self.manager.committed().as_ref();

        for key in self.session.deleted.keys() {
            if let Some(log) = undo.as_deref_mut() {
                log.record(committed, &key)?;
            }
            committed.delete(&key)?;
        }

        for pair in self.session.writes.pairs() {
            let (key, value) = pair.into_parts();
            if let Some(log) = undo.as_deref_mut() {
                log.record(committed, &key)?;
            }
            committed.set(key, value)?;
        }
        Ok(())
    }

    /// Resolves a read that missed this transaction's buffers.
    ///
    /// `known` is the committed value when the caller already holds it.
    fn resolve(&self, key: &str, known: Option<&V>) -> CoreResult<V> {
        match self.isolation()? {
            IsolationLevel::ReadUncommitted => match self.manager.dirty_read(self.id, key) {
                Some(value) => Ok(value),
                None => self.read_committed(key, known),
            },
            IsolationLevel::ReadCommitted => self.read_committed(key, known),
            IsolationLevel::RepeatableRead => self.read_pinned(key, known),
            IsolationLevel::Serializable => {
                self.manager.serial().acquire(self.id);
                self.read_pinned(key, known)
            }
        }
    }

    fn read_committed(&self, key: &str, known: Option<&V>) -> CoreResult<V> {
        match known {
            Some(value) => Ok(value.clone()),
            None => Ok(self.manager.committed().get(key)?),
        }
    }

    /// Reads through the snapshot cache, memoizing committed values.
    fn read_pinned(&self, key: &str, known: Option<&V>) -> CoreResult<V> {
        if let Some(value) = self.session.snapshot.lookup(key) {
            return Ok(value);
        }

        let value = self.read_committed(key, known)?;
        self.session.snapshot.set(key.to_string(), value.clone())?;
        trace!(txid = %self.id, key, "memoized read");
        Ok(value)
    }

    fn clear_buffers(&self) {
        let _ = self.session.writes.clear();
        let _ = self.session.deleted.clear();
        let _ = self.session.snapshot.clear();
    }

    /// Moves to a terminal state and releases everything held.
    fn finish(&self, state: &mut TransactionState, outcome: TransactionState) {
        self.clear_buffers();
        *state = outcome;
        self.manager.deregister(self.id);
        self.manager.serial().release(self.id);
        debug!(txid = %self.id, ?outcome, "transaction finished");
    }

    fn check_active(&self, state: TransactionState) -> CoreResult<()> {
        match state {
            TransactionState::Active => Ok(()),
            TransactionState::Committed | TransactionState::RolledBack => {
                Err(CoreError::inactive(self.id))
            }
        }
    }

    fn ensure_active(&self) -> CoreResult<()> {
        self.check_active(self.state())
    }
}

impl<V: Value> Drop for Transaction<V> {
    fn drop(&mut self) {
        if self.is_active() {
            let _ = self.rollback();
        }
    }
}

impl<V: Value> std::fmt::Debug for Transaction<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("isolation", &self.isolation)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
