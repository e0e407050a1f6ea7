//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use isokv_core::{Database, IsolationLevel};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generate a random alphanumeric value of the specified length.
pub fn random_value(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate `count` distinct keys.
pub fn generate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key{i:08}")).collect()
}

/// Create a database holding `count` committed keys with values of `value_len`.
pub fn populated_db(count: usize, value_len: usize) -> Database<String> {
    let db = Database::new();
    let keys = generate_keys(count);
    db.transaction(IsolationLevel::ReadCommitted, |txn| {
        for key in keys {
            txn.set(key, random_value(value_len))?;
        }
        Ok(())
    })
    .expect("Failed to populate database");
    db
}
