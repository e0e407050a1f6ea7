//! Model-checked test harness.
//!
//! Replays scripted transactions against a database and a `HashMap`
//! model of the committed state, checking every read along the way.

use crate::generators::{TxnOp, TxnScript};
use isokv_core::{CoreResult, Database, IsolationLevel};
use std::collections::{HashMap, HashSet};

/// A harness pairing a database with a model of its committed state.
pub struct ModelHarness {
    /// The database instance.
    pub db: Database<String>,
    /// Expected committed state.
    model: HashMap<String, String>,
}

impl Default for ModelHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelHarness {
    /// Creates a harness over an empty in-memory database.
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            model: HashMap::new(),
        }
    }

    /// Runs one script to completion in a transaction at `level`.
    ///
    /// Scripts run one at a time, so every level must behave like
    /// read-committed over a quiescent store.
    ///
    /// # Panics
    ///
    /// Panics if a read disagrees with the model or an operation fails.
    pub fn run(&mut self, level: IsolationLevel, script: &TxnScript) {
        let txn = self.db.begin(level);
        let mut pending: HashMap<&str, &str> = HashMap::new();
        let mut deleted: HashSet<&str> = HashSet::new();

        for op in &script.ops {
            match op {
                TxnOp::Set { key, value } => {
                    txn.set(key.as_str(), value.clone()).expect("set failed");
                    pending.insert(key, value);
                }
                TxnOp::Delete { key } => {
                    txn.delete(key).expect("delete failed");
                    pending.remove(key.as_str());
                    deleted.insert(key);
                }
                TxnOp::Get { key } => {
                    let expected = if deleted.contains(key.as_str()) {
                        None
                    } else if let Some(value) = pending.get(key.as_str()) {
                        Some((*value).to_string())
                    } else {
                        self.model.get(key).cloned()
                    };
                    assert_eq!(
                        lookup(txn.get(key)),
                        expected,
                        "read of {key} at {level} disagrees with model"
                    );
                }
            }
        }

        if script.commit {
            txn.commit().expect("commit failed");
            for key in &deleted {
                self.model.remove(*key);
            }
            for (key, value) in pending {
                self.model.insert(key.to_string(), value.to_string());
            }
        } else {
            txn.rollback().expect("rollback failed");
        }
    }

    /// Verifies the committed store matches the model exactly.
    ///
    /// # Panics
    ///
    /// Panics on any mismatch.
    pub fn verify_all(&self) {
        let txn = self.db.begin(IsolationLevel::ReadCommitted);
        let mut actual = HashMap::new();
        txn.range(|key, value| -> CoreResult<()> {
            actual.insert(key.to_string(), value.clone());
            Ok(())
        })
        .expect("range failed");
        assert_eq!(actual, self.model, "committed state disagrees with model");
        assert_eq!(self.db.active_count(), 1);
    }

    /// Returns the number of keys the model expects to be committed.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.model.len()
    }
}

/// Converts a read into an `Option`, panicking on anything but not-found.
fn lookup(result: CoreResult<String>) -> Option<String> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_not_found() => None,
        Err(err) => panic!("unexpected read error: {err}"),
    }
}
