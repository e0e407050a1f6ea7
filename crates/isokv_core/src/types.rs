//! Core type definitions for IsoKV.

use crate::error::CoreError;
use std::fmt;

/// Bound satisfied by every value type a database can hold.
///
/// Values are opaque to IsoKV. They are cloned out of stores on read and
/// moved between threads by commits and dirty reads.
pub trait Value: Clone + Send + Sync + 'static {}

impl<T> Value for T where T: Clone + Send + Sync + 'static {}

/// Unique identifier for a transaction.
///
/// Transaction IDs are monotonically increasing and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Creates a new transaction ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// Isolation level of a transaction.
///
/// The discriminants are the raw codes accepted by
/// [`crate::Database::begin_with_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum IsolationLevel {
    /// Reads may observe other transactions' uncommitted writes.
    ReadUncommitted = 1,
    /// Reads observe the latest committed value.
    ReadCommitted = 2,
    /// The first committed value read for a key is pinned for the
    /// rest of the transaction.
    RepeatableRead = 3,
    /// Like `RepeatableRead`, and serializable transactions are ordered
    /// against each other by a database-wide lock.
    Serializable = 4,
}

impl IsolationLevel {
    /// All defined levels, weakest first.
    pub const ALL: [Self; 4] = [
        Self::ReadUncommitted,
        Self::ReadCommitted,
        Self::RepeatableRead,
        Self::Serializable,
    ];

    /// Returns the raw code of this level.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true if reads are memoized per transaction.
    #[must_use]
    pub const fn pins_reads(self) -> bool {
        matches!(self, Self::RepeatableRead | Self::Serializable)
    }
}

impl TryFrom<u8> for IsolationLevel {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::ReadUncommitted),
            2 => Ok(Self::ReadCommitted),
            3 => Ok(Self::RepeatableRead),
            4 => Ok(Self::Serializable),
            _ => Err(CoreError::invalid_isolation_level(code)),
        }
    }
}

impl From<IsolationLevel> for u8 {
    fn from(level: IsolationLevel) -> Self {
        level.code()
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadUncommitted => "read-uncommitted",
            Self::ReadCommitted => "read-committed",
            Self::RepeatableRead => "repeatable-read",
            Self::Serializable => "serializable",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_id_ordering() {
        let t1 = TransactionId::new(1);
        let t2 = TransactionId::new(2);
        assert!(t1 < t2);
        assert_eq!(format!("{t2}"), "txn:2");
    }

    #[test]
    fn isolation_codes_round_trip() {
        for level in IsolationLevel::ALL {
            assert_eq!(IsolationLevel::try_from(level.code()).unwrap(), level);
        }
    }

    #[test]
    fn isolation_rejects_unknown_codes() {
        for code in [0u8, 5, 200] {
            let err = IsolationLevel::try_from(code).unwrap_err();
            assert!(matches!(err, CoreError::InvalidIsolationLevel { code: c } if c == code));
        }
    }

    #[test]
    fn isolation_pins_reads() {
        assert!(!IsolationLevel::ReadUncommitted.pins_reads());
        assert!(!IsolationLevel::ReadCommitted.pins_reads());
        assert!(IsolationLevel::RepeatableRead.pins_reads());
        assert!(IsolationLevel::Serializable.pins_reads());
    }

    #[test]
    fn isolation_display() {
        assert_eq!(IsolationLevel::Serializable.to_string(), "serializable");
        assert_eq!(IsolationLevel::ReadUncommitted.to_string(), "read-uncommitted");
    }
}
