//! Key-value store trait definition.

use crate::error::StoreResult;

/// A persisted scalar key-value store for attrsync.
///
/// Stores are **flat string maps**. They hold the string form of every
/// persisted counter, ledger and attribute value. attrsync owns all
/// interpretation - stores do not understand attribute encodings,
/// version counters or the dirty-key ledger.
///
/// # Invariants
///
/// - `get` returns exactly the string previously written for that key
/// - `set` replaces any previous value for the key
/// - `flush` ensures all mutations made so far are durable
/// - Stores must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::MemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait KvStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be staged for writing.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes the value stored under `key`. Removing an absent key is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be staged.
    fn remove(&mut self, key: &str) -> StoreResult<()>;

    /// Flushes all pending mutations to durable storage.
    ///
    /// After this returns successfully, every previously written value
    /// is guaranteed to survive process termination.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StoreResult<()>;

    /// Returns true if `key` currently has a stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
