//! Snapshot persistence
//!
//! Stores hand their whole collection to a [`Snapshot`] after every
//! committed mutation and read it back once at start-up. The JSON file
//! backend writes an indented array and fully overwrites the previous file.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Snapshot backend errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("snapshot backend unavailable: {0}")]
    Unavailable(String),
}

/// Save/load interface for one entity collection
pub trait Snapshot<T>: Send + Sync {
    /// Replace the persisted collection with `records`
    fn save(&self, records: &[T]) -> Result<(), SnapshotError>;

    /// Read the persisted collection, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<Vec<T>>, SnapshotError>;
}

/// JSON array file snapshot
#[derive(Debug, Clone)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Snapshot<T> for JsonFileSnapshot
where
    T: Serialize + DeserializeOwned,
{
    fn save(&self, records: &[T]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(records)?;

        // 先写临时文件再 rename
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<T>>, SnapshotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }
        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// In-memory snapshot
///
/// Keeps the last saved collection in process memory. `set_failing(true)`
/// makes every `save` fail, which is how persistence errors are exercised.
#[derive(Debug)]
pub struct MemorySnapshot<T> {
    records: Mutex<Option<Vec<T>>>,
    failing: Mutex<bool>,
}

impl<T> MemorySnapshot<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(None),
            failing: Mutex::new(false),
        }
    }

    /// Pre-seed the snapshot as if a previous process had saved `records`
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(Some(records)),
            failing: Mutex::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

impl<T: Clone> MemorySnapshot<T> {
    /// Last successfully saved collection
    pub fn saved(&self) -> Option<Vec<T>> {
        self.records.lock().clone()
    }
}

impl<T> Default for MemorySnapshot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Snapshot<T> for MemorySnapshot<T>
where
    T: Clone + Send,
{
    fn save(&self, records: &[T]) -> Result<(), SnapshotError> {
        if *self.failing.lock() {
            return Err(SnapshotError::Unavailable("memory snapshot set to fail".into()));
        }
        *self.records.lock() = Some(records.to_vec());
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<T>>, SnapshotError> {
        Ok(self.records.lock().clone())
    }
}
