//! Database configuration.

use std::fmt;

/// Where committed data is meant to live.
///
/// Recorded in [`Config`] but not consulted by any component: every
/// database keeps its committed state in the store it was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Disk-backed copies.
    DiscCopies,
    /// Memory-only copies.
    RamCopies,
}

impl StorageKind {
    /// Returns the canonical name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiscCopies => "discCopies",
            Self::RamCopies => "ramCopies",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for creating a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Intended storage kind (informational only).
    pub storage_kind: StorageKind,

    /// Whether a commit that fails while applying restores the committed
    /// values it already overwrote before reporting the error.
    pub undo_failed_commits: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_kind: StorageKind::RamCopies,
            undo_failed_commits: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage kind.
    #[must_use]
    pub const fn storage_kind(mut self, kind: StorageKind) -> Self {
        self.storage_kind = kind;
        self
    }

    /// Sets whether failed commits undo their partial apply.
    #[must_use]
    pub const fn undo_failed_commits(mut self, value: bool) -> Self {
        self.undo_failed_commits = value;
        self
    }
}
