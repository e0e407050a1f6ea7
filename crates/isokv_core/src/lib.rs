//! # IsoKV Core
//!
//! Core transaction engine for IsoKV.
//!
//! This crate provides:
//! - [`Database`], the entry point owning the committed store
//! - [`Transaction`], buffering writes and deletes until commit
//! - Four isolation levels, chosen per transaction
//! - The session registry behind read-uncommitted dirty reads
//!
//! The committed state lives in any [`isokv_storage::KvStore`]; the default
//! is an [`isokv_storage::InMemoryStore`]. Nothing is persisted.
//!
//! ## Example
//!
//! ```rust
//! use isokv_core::{Database, IsolationLevel};
//!
//! let db: Database<i64> = Database::new();
//!
//! let writer = db.begin(IsolationLevel::ReadCommitted);
//! writer.set("balance", 100)?;
//! writer.commit()?;
//!
//! let reader = db.begin(IsolationLevel::RepeatableRead);
//! assert_eq!(reader.get("balance")?, 100);
//! # Ok::<(), isokv_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod transaction;
mod types;

pub use config::{Config, StorageKind};
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use transaction::{Transaction, TransactionManager, TransactionState};
pub use types::{IsolationLevel, TransactionId, Value};

pub use isokv_storage::{InMemoryStore, Key, KvStore, Pair, StorageError};
