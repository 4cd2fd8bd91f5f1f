//! The persisted dirty-key ledger.

use crate::keys::KEY_DIRTY_KEYS;
use attrsync_store::{KvStore, StoreResult};

/// Separator between ledger entries.
///
/// Distinct from the codec's `;` list separator: ledger entries are
/// plain attribute keys and need no quoting.
const SEPARATOR: char = ',';

/// An ordered set of attribute keys whose stored values may not have
/// reached the server.
///
/// The ledger is backed by one persisted string. Every mutation fully
/// re-serializes and persists it - there is no incremental persistence,
/// so a crash loses at most the most recent edit and can never leave
/// the ledger corrupted.
#[derive(Debug, Default)]
pub struct DirtyLedger {
    keys: Vec<String>,
}

impl DirtyLedger {
    /// Loads the ledger from its persisted string.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(store: &dyn KvStore) -> StoreResult<Self> {
        let keys = match store.get(KEY_DIRTY_KEYS)? {
            Some(raw) if !raw.is_empty() => {
                raw.split(SEPARATOR).map(str::to_string).collect()
            }
            _ => Vec::new(),
        };
        Ok(Self { keys })
    }

    /// Adds a key. Idempotent; persists on change.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be persisted.
    pub fn add(&mut self, store: &mut dyn KvStore, key: &str) -> StoreResult<()> {
        if !self.contains(key) {
            self.keys.push(key.to_string());
            self.persist(store)?;
        }
        Ok(())
    }

    /// Removes a key. Idempotent; persists on change.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be persisted.
    pub fn remove(&mut self, store: &mut dyn KvStore, key: &str) -> StoreResult<()> {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        if self.keys.len() != before {
            self.persist(store)?;
        }
        Ok(())
    }

    /// Removes every key and persists the empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be persisted.
    pub fn clear(&mut self, store: &mut dyn KvStore) -> StoreResult<()> {
        if !self.keys.is_empty() {
            self.keys.clear();
            self.persist(store)?;
        }
        Ok(())
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns true if the key is dirty.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Returns true if no key is dirty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn persist(&self, store: &mut dyn KvStore) -> StoreResult<()> {
        let joined = self.keys.join(&SEPARATOR.to_string());
        store.set(KEY_DIRTY_KEYS, &joined)?;
        store.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrsync_store::MemoryStore;

    #[test]
    fn add_is_idempotent_and_ordered() {
        let mut store = MemoryStore::new();
        let mut ledger = DirtyLedger::default();

        ledger.add(&mut store, "coins").unwrap();
        ledger.add(&mut store, "name").unwrap();
        ledger.add(&mut store, "coins").unwrap();

        assert_eq!(ledger.keys(), ["coins", "name"]);
        assert_eq!(
            store.get(KEY_DIRTY_KEYS).unwrap().as_deref(),
            Some("coins,name")
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = MemoryStore::new();
        let mut ledger = DirtyLedger::default();

        ledger.add(&mut store, "coins").unwrap();
        ledger.remove(&mut store, "coins").unwrap();
        ledger.remove(&mut store, "coins").unwrap();

        assert!(ledger.is_empty());
        assert_eq!(store.get(KEY_DIRTY_KEYS).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn survives_reload() {
        let mut store = MemoryStore::new();
        {
            let mut ledger = DirtyLedger::default();
            ledger.add(&mut store, "coins").unwrap();
            ledger.add(&mut store, "tags").unwrap();
        }

        let ledger = DirtyLedger::load(&store).unwrap();
        assert_eq!(ledger.keys(), ["coins", "tags"]);
        assert!(ledger.contains("tags"));
    }

    #[test]
    fn clear_persists_empty() {
        let mut store = MemoryStore::new();
        let mut ledger = DirtyLedger::default();

        ledger.add(&mut store, "a").unwrap();
        ledger.add(&mut store, "b").unwrap();
        ledger.clear(&mut store).unwrap();

        assert!(ledger.is_empty());
        let reloaded = DirtyLedger::load(&store).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn empty_store_loads_empty_ledger() {
        let store = MemoryStore::new();
        let ledger = DirtyLedger::load(&store).unwrap();
        assert!(ledger.is_empty());
    }
}
