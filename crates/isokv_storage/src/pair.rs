//! Key type and key-value pairs.

/// Key type used by every store.
pub type Key = String;

/// An immutable key-value pair produced by snapshot queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair<V> {
    key: Key,
    value: V,
}

impl<V> Pair<V> {
    /// Creates a new pair.
    pub fn new(key: impl Into<Key>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Splits the pair into its key and value.
    #[must_use]
    pub fn into_parts(self) -> (Key, V) {
        (self.key, self.value)
    }
}

impl<V> From<(Key, V)> for Pair<V> {
    fn from((key, value): (Key, V)) -> Self {
        Self { key, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let pair = Pair::new("a", 1);
        assert_eq!(pair.key(), "a");
        assert_eq!(*pair.value(), 1);
        assert_eq!(pair.into_parts(), ("a".to_string(), 1));
    }

    #[test]
    fn from_tuple() {
        let pair: Pair<&str> = ("k".to_string(), "v").into();
        assert_eq!(pair, Pair::new("k", "v"));
    }
}
