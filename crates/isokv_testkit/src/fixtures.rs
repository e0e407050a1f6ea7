//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use isokv_core::{Config, Database, IsolationLevel};

/// Runs a test with a fresh in-memory database of string values.
///
/// # Example
///
/// ```rust
/// use isokv_testkit::with_db;
///
/// with_db(|db| {
///     assert_eq!(db.active_count(), 0);
/// });
/// ```
pub fn with_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database<String>) -> R,
{
    let db = Database::new();
    f(&db)
}

/// Runs a test with a fresh database built from `config`.
pub fn with_config_db<F, R>(config: Config, f: F) -> R
where
    F: FnOnce(&Database<String>) -> R,
{
    let db = Database::with_config(config);
    f(&db)
}

/// Creates a database whose committed store already holds `entries`.
///
/// The entries are committed through a single read-committed transaction.
pub fn seeded_db<I, K, V>(entries: I) -> Database<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let db = Database::new();
    db.transaction(IsolationLevel::ReadCommitted, |txn| {
        for (key, value) in entries {
            txn.set(key, value.into())?;
        }
        Ok(())
    })
    .expect("Failed to seed database");
    db
}

/// Commits a single key-value pair in its own transaction.
pub fn commit_one(db: &Database<String>, key: &str, value: &str) {
    db.transaction(IsolationLevel::ReadCommitted, |txn| {
        txn.set(key, value.to_string())
    })
    .expect("Failed to commit value");
}

/// Reads `key` through a fresh read-committed transaction.
///
/// Returns `None` if the key is absent.
pub fn read_committed(db: &Database<String>, key: &str) -> Option<String> {
    let txn = db.begin(IsolationLevel::ReadCommitted);
    match txn.get(key) {
        Ok(value) => Some(value),
        Err(err) if err.is_not_found() => None,
        Err(err) => panic!("unexpected read error: {err}"),
    }
}
