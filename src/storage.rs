//! Storage layer for kanban
//!
//! A small key-value record store rooted in a data directory. Each record is
//! one file, written whole on every update.
//!
//! # Directory Structure
//!
//! ```text
//! <data dir>/
//!   kanban.toml                 # Optional configuration
//!   kanbanData.json             # Board snapshot (default key)
//!   kanbanData.json.lock        # Writer lock for the snapshot
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Extension appended to record keys on disk
const RECORD_EXTENSION: &str = "json";

/// Storage manager for kanban records
#[derive(Debug, Clone)]
pub struct Storage {
    /// Directory holding every record
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Storage in the platform data directory (e.g. `~/.local/share/kanban`)
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "kanban").ok_or_else(|| {
            Error::OperationFailed("could not determine a data directory".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    /// Explicit directory if given, platform default otherwise
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Ok(Self::new(dir.to_path_buf())),
            None => Self::default_location(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{RECORD_EXTENSION}"))
    }

    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Take the writer lock for `key`; it is released when the guard drops.
    pub fn lock(&self, key: &str) -> Result<FileLock> {
        self.init()?;
        FileLock::acquire(
            lock::lock_path_for(&self.record_path(key)),
            DEFAULT_LOCK_TIMEOUT_MS,
        )
    }

    /// Read the raw value stored under `key`, if any
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key);
        lock::read_locked(&path, DEFAULT_LOCK_TIMEOUT_MS)?
            .map(|bytes| utf8(key, bytes))
            .transpose()
    }

    /// `get` for a caller already holding the lock from `lock(key)`
    pub fn get_held(&self, _lock: &FileLock, key: &str) -> Result<Option<String>> {
        match fs::read(self.record_path(key)) {
            Ok(bytes) => utf8(key, bytes).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    /// Replace the value stored under `key` while holding its lock
    ///
    /// The write is atomic: readers see either the previous value or the new
    /// one in full.
    pub fn set_held(&self, _lock: &FileLock, key: &str, value: &str) -> Result<()> {
        lock::write_atomic(self.record_path(key), value.as_bytes())
    }
}

fn utf8(key: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|err| Error::OperationFailed(format!("Invalid UTF-8 in {key}: {err}")))
}
