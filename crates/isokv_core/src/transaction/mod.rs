//! Transaction management with per-transaction isolation levels.
//!
//! IsoKV transactions:
//! - Buffer writes and deletes until commit
//! - Read their own writes
//! - Resolve other reads according to their [`crate::IsolationLevel`]
//! - Order serializable transactions with one database-wide lock

mod manager;
mod serial;
mod state;

pub use manager::TransactionManager;
pub use state::{Transaction, TransactionState};
