//! Database-wide lock ordering serializable transactions.

use crate::types::TransactionId;
use parking_lot::{Condvar, Mutex};

/// A mutual-exclusion lock owned by a transaction rather than a thread.
///
/// A serializable transaction takes the lock on its first read or at
/// commit, and keeps it until it commits or rolls back. Re-acquiring by the
/// owner is a no-op, so a transaction may read many times and then commit.
#[derive(Debug, Default)]
pub(crate) struct SerialLock {
    owner: Mutex<Option<TransactionId>>,
    released: Condvar,
}

impl SerialLock {
    /// Blocks until `id` owns the lock.
    pub(crate) fn acquire(&self, id: TransactionId) {
        let mut owner = self.owner.lock();
        loop {
            match *owner {
                None => {
                    *owner = Some(id);
                    return;
                }
                Some(current) if current == id => return,
                Some(_) => self.released.wait(&mut owner),
            }
        }
    }

    /// Releases the lock if `id` owns it.
    pub(crate) fn release(&self, id: TransactionId) {
        let mut owner = self.owner.lock();
        if *owner == Some(id) {
            *owner = None;
            self.released.notify_one();
        }
    }

    /// Returns the current owner.
    pub(crate) fn owner(&self) -> Option<TransactionId> {
        *self.owner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn acquire_is_reentrant_for_owner() {
        let lock = SerialLock::default();
        let id = TransactionId::new(1);
        lock.acquire(id);
        lock.acquire(id);
        assert_eq!(lock.owner(), Some(id));
        lock.release(id);
        assert_eq!(lock.owner(), None);
    }

    #[test]
    fn release_by_non_owner_is_ignored() {
        let lock = SerialLock::default();
        lock.acquire(TransactionId::new(1));
        lock.release(TransactionId::new(2));
        assert_eq!(lock.owner(), Some(TransactionId::new(1)));
    }

    #[test]
    fn second_owner_waits_for_release() {
        let lock = Arc::new(SerialLock::default());
        let first = TransactionId::new(1);
        let second = TransactionId::new(2);
        lock.acquire(first);

        let acquired = Arc::new(AtomicBool::new(false));
        let handle = {
            let lock = Arc::clone(&lock);
            let acquired = Arc::clone(&acquired);
            thread::spawn(move || {
                lock.acquire(second);
                acquired.store(true, Ordering::SeqCst);
                lock.release(second);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!acquired.load(Ordering::SeqCst));

        lock.release(first);
        handle.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));
        assert_eq!(lock.owner(), None);
    }
}
