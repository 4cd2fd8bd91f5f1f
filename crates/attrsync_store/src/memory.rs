//! In-memory store for testing.

use crate::error::StoreResult;
use crate::kv::KvStore;
use std::collections::HashMap;

/// An in-memory key-value store.
///
/// This store keeps all values in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral profiles that don't need persistence
///
/// # Example
///
/// ```rust
/// use attrsync_store::{KvStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set("coins", "10").unwrap();
/// assert!(store.contains("coins").unwrap());
/// store.remove("coins").unwrap();
/// assert!(!store.contains("coins").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with data.
    ///
    /// Useful for testing restart/recovery scenarios.
    #[must_use]
    pub fn with_data(data: HashMap<String, String>) -> Self {
        Self { data }
    }

    /// Returns a copy of all stored data.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn data(&self) -> HashMap<String, String> {
        self.data.clone()
    }

    /// Clears all stored data.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.data.remove(key);
        Ok(())
    }

    fn flush(&mut self) -> StoreResult<()> {
        // Nothing pending for an in-memory store
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);

        // Removing an absent key is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn seeded_store() {
        let mut data = HashMap::new();
        data.insert("profile_local_version".to_string(), "7".to_string());

        let store = MemoryStore::with_data(data);
        assert_eq!(
            store.get("profile_local_version").unwrap().as_deref(),
            Some("7")
        );
    }

    #[test]
    fn contains_and_clear() {
        let mut store = MemoryStore::new();
        store.set("x", "y").unwrap();
        assert!(store.contains("x").unwrap());

        store.clear();
        assert!(!store.contains("x").unwrap());
    }
}
