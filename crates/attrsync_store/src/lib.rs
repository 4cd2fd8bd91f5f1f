//! # attrsync Store
//!
//! Persisted key-value store trait and implementations for attrsync.
//!
//! This crate provides the lowest-level persistence abstraction for
//! attrsync. Stores are **flat string maps** - they hold the string
//! form of every persisted counter, ledger and attribute value, and do
//! not interpret the data they store.
//!
//! ## Design Principles
//!
//! - Stores are simple string maps (get, set, remove, flush)
//! - No knowledge of attribute encoding or version semantics
//! - `flush` makes everything written so far durable
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - For testing and ephemeral state
//! - [`FileStore`] - For persistent state using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use attrsync_store::{KvStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.set("profile_local_version", "3").unwrap();
//! assert_eq!(store.get("profile_local_version").unwrap().as_deref(), Some("3"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod kv;
mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use kv::KvStore;
pub use memory::MemoryStore;
