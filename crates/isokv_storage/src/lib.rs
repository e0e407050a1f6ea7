//! # IsoKV Storage
//!
//! Key-value store trait and implementations for IsoKV.
//!
//! This crate provides the lowest-level storage abstraction for IsoKV.
//! Stores are **plain key-value maps** - they know nothing about
//! transactions, isolation levels or sessions.
//!
//! ## Design Principles
//!
//! - Stores are simple maps (set, get, delete, iterate)
//! - `set` always overwrites, `delete` of an absent key is a no-op
//! - Iteration order is unspecified
//! - Must be `Send + Sync`; stores synchronize internally
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - Hash map behind a read-write lock
//!
//! ## Example
//!
//! ```rust
//! use isokv_storage::{KvStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! store.set("hello".to_string(), "world").unwrap();
//! assert_eq!(store.get("hello").unwrap(), "world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod pair;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStore;
pub use pair::{Key, Pair};
pub use store::KvStore;
