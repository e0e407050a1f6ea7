//! # IsoKV Testkit
//!
//! Test utilities for IsoKV.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based test generators using proptest
//! - A fault-injecting store for commit failure paths
//! - A model-checked harness for operation sequences
//! - Concurrent stress testing utilities
//!
//! ## Usage
//!
//! ```rust
//! use isokv_testkit::prelude::*;
//! use isokv_core::IsolationLevel;
//!
//! with_db(|db| {
//!     let txn = db.begin(IsolationLevel::ReadCommitted);
//!     txn.set("k", "v".to_string()).unwrap();
//!     txn.commit().unwrap();
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fault;
pub mod fixtures;
pub mod generators;
pub mod harness;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fault::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::harness::*;
    pub use crate::stress::*;
}

pub use fault::*;
pub use fixtures::*;
pub use generators::*;
pub use harness::*;
pub use stress::*;
