//! File-based store for persistent state.

use crate::error::{StoreError, StoreResult};
use crate::kv::KvStore;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A file-backed key-value store.
///
/// The store holds its map in memory and rewrites the whole file on
/// [`KvStore::flush`]. The rewrite goes through a temporary file that is
/// atomically renamed over the old one, so a crash mid-flush leaves the
/// previous snapshot intact rather than a torn file.
///
/// The on-disk format is a single JSON object mapping keys to string
/// values. An advisory lock file guards against two processes opening
/// the same store.
///
/// # Example
///
/// ```no_run
/// use attrsync_store::{FileStore, KvStore};
/// use std::path::Path;
///
/// let mut store = FileStore::open(Path::new("profile.json")).unwrap();
/// store.set("profile_local_version", "1").unwrap();
/// store.flush().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: HashMap<String, String>,
    dirty: bool,
    // Held for the lifetime of the store; the advisory lock is released
    // when this handle is dropped.
    _lock: File,
}

impl FileStore {
    /// Opens or creates a file store at the given path.
    ///
    /// If the file exists its contents are loaded; otherwise the store
    /// starts empty and the file is created on the first flush.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired, the file cannot
    /// be read, or its contents are not a flat JSON string map.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let lock_path = path.with_extension("lock");
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        lock.try_lock_exclusive().map_err(|_| StoreError::Locked {
            path: path.display().to_string(),
        })?;

        let data = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str::<HashMap<String, String>>(&raw)
                    .map_err(|e| StoreError::Corrupted(e.to_string()))?
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            data,
            dirty: false,
            _lock: lock,
        })
    }

    /// Opens or creates a file store, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file
    /// cannot be opened.
    pub fn open_with_create_dirs(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.data.insert(key.to_string(), value.to_string());
        self.dirty = true;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        if self.data.remove(key).is_some() {
            self.dirty = true;
        }
        Ok(())
    }

    fn flush(&mut self) -> StoreResult<()> {
        if !self.dirty {
            return Ok(());
        }

        let encoded = serde_json::to_string_pretty(&self.data)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(encoded.as_bytes())?;
            tmp.sync_all()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;

        self.dirty = false;
        Ok(())
    }
}
