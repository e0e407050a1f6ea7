//! Property-based test generators using proptest.
//!
//! Provides strategies for generating keys, values, isolation levels and
//! sequences of transaction operations.

use isokv_core::IsolationLevel;
use proptest::prelude::*;

/// An operation applied to an open transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxnOp {
    /// Buffer a write.
    Set {
        /// Key to write.
        key: String,
        /// Value to write.
        value: String,
    },
    /// Record a delete.
    Delete {
        /// Key to delete.
        key: String,
    },
    /// Read a key.
    Get {
        /// Key to read.
        key: String,
    },
}

impl TxnOp {
    /// Returns the key the operation touches.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Delete { key } | Self::Get { key } => key,
        }
    }
}

/// A transaction's worth of operations and how it ends.
#[derive(Debug, Clone)]
pub struct TxnScript {
    /// Operations in order.
    pub ops: Vec<TxnOp>,
    /// Whether the transaction commits (otherwise it rolls back).
    pub commit: bool,
}

/// Strategy for keys drawn from a small alphabet so operations collide.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("k[0-7]").expect("Invalid regex")
}

/// Strategy for short printable values.
pub fn value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{0,12}").expect("Invalid regex")
}

/// Strategy for any defined isolation level.
pub fn isolation_strategy() -> impl Strategy<Value = IsolationLevel> {
    prop::sample::select(IsolationLevel::ALL.to_vec())
}

/// Strategy for a single transaction operation.
pub fn txn_op_strategy() -> impl Strategy<Value = TxnOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy()).prop_map(|(key, value)| TxnOp::Set { key, value }),
        1 => key_strategy().prop_map(|key| TxnOp::Delete { key }),
        2 => key_strategy().prop_map(|key| TxnOp::Get { key }),
    ]
}

/// Strategy for a scripted transaction of up to `max_ops` operations.
pub fn txn_script_strategy(max_ops: usize) -> impl Strategy<Value = TxnScript> {
    (
        prop::collection::vec(txn_op_strategy(), 0..max_ops),
        prop::bool::weighted(0.75),
    )
        .prop_map(|(ops, commit)| TxnScript { ops, commit })
}

/// Configuration for property-based tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn keys_collide_on_small_alphabet(key in key_strategy()) {
            prop_assert_eq!(key.len(), 2);
            prop_assert!(key.starts_with('k'));
        }

        #[test]
        fn isolation_is_defined(level in isolation_strategy()) {
            prop_assert!(IsolationLevel::try_from(level.code()).is_ok());
        }

        #[test]
        fn scripts_respect_max_ops(script in txn_script_strategy(10)) {
            prop_assert!(script.ops.len() < 10);
            for op in &script.ops {
                prop_assert!(op.key().starts_with('k'));
            }
        }
    }
}
