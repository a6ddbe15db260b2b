//! Generic locked collection
//!
//! Every store is a [`Collection`]: a `BTreeMap` keyed by store-assigned IDs
//! plus the next-ID counter, behind one coarse `parking_lot::RwLock`, with a
//! pluggable [`Snapshot`] backend.
//!
//! Mutations commit under the write lock, take a [`Pending`] copy of the
//! whole collection, release the lock, then flush the copy. A generation
//! counter makes sure a slower flush never overwrites a newer one.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::error::{StoreError, StoreResult};
use super::snapshot::Snapshot;

/// Record kept in a [`Collection`]
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Entity name used in errors and logs
    const NAME: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);
}

/// Return `Cancelled` if the caller has given up
pub fn check_cancelled(cancel: &CancellationToken) -> StoreResult<()> {
    if cancel.is_cancelled() {
        return Err(StoreError::Cancelled);
    }
    Ok(())
}

/// Map + ID counter guarded by the collection lock
#[derive(Debug)]
pub struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
    generation: u64,
}

impl<T: Entity> Table<T> {
    fn empty() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
            generation: 0,
        }
    }

    fn from_records(records: Vec<T>) -> Self {
        let rows: BTreeMap<i64, T> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = rows.keys().next_back().map(|max| max + 1).unwrap_or(1);
        Self {
            rows,
            next_id,
            generation: 0,
        }
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Records in ascending ID order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Assign the next ID and insert; IDs are never reused
    pub fn insert_new(&mut self, mut record: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        record.set_id(id);
        self.rows.insert(id, record.clone());
        self.generation += 1;
        record
    }

    /// Whole-record replace, keeping `id`
    pub fn replace(&mut self, id: i64, mut record: T) -> StoreResult<T> {
        let slot = self.rows.get_mut(&id).ok_or(StoreError::NotFound {
            entity: T::NAME,
            id,
        })?;
        record.set_id(id);
        *slot = record.clone();
        self.generation += 1;
        Ok(record)
    }

    pub fn remove(&mut self, id: i64) -> StoreResult<T> {
        let removed = self.rows.remove(&id).ok_or(StoreError::NotFound {
            entity: T::NAME,
            id,
        })?;
        self.generation += 1;
        Ok(removed)
    }

    /// Mark in-place edits made through [`Table::get_mut`]
    pub fn touch(&mut self) {
        self.generation += 1;
    }

    /// Copy of the committed state, to be flushed after the lock is released
    pub fn pending(&self) -> Pending<T> {
        Pending {
            generation: self.generation,
            records: self.rows.values().cloned().collect(),
        }
    }
}

/// Collection state captured at commit time
#[derive(Debug)]
pub struct Pending<T> {
    generation: u64,
    records: Vec<T>,
}

/// Locked collection with snapshot persistence
pub struct Collection<T: Entity> {
    table: RwLock<Table<T>>,
    snapshot: Arc<dyn Snapshot<T>>,
    /// Generation of the last flushed snapshot
    flushed: Mutex<u64>,
}

impl<T: Entity> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("entity", &T::NAME)
            .field("len", &self.table.read().len())
            .finish()
    }
}

impl<T: Entity> Collection<T> {
    pub fn new(snapshot: Arc<dyn Snapshot<T>>) -> Self {
        Self {
            table: RwLock::new(Table::empty()),
            snapshot,
            flushed: Mutex::new(0),
        }
    }

    /// Re-seed the collection from its snapshot
    ///
    /// A missing snapshot leaves the collection empty. Returns the number of
    /// loaded records.
    pub fn load_snapshot(&self) -> StoreResult<usize> {
        let records = self
            .snapshot
            .load()
            .map_err(|e| StoreError::Persistence(format!("failed to load {}: {}", T::NAME, e)))?;

        let Some(records) = records else {
            tracing::warn!(entity = T::NAME, "No snapshot found, starting empty");
            *self.table.write() = Table::empty();
            return Ok(0);
        };

        let count = records.len();
        let table = Table::from_records(records);
        tracing::info!(
            entity = T::NAME,
            count,
            next_id = table.next_id(),
            "Snapshot loaded"
        );
        *self.table.write() = table;
        *self.flushed.lock() = 0;
        Ok(count)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Table<T>> {
        self.table.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Table<T>> {
        self.table.write()
    }

    /// Write a captured state unless a newer one was already written
    pub fn flush(&self, pending: Pending<T>) -> StoreResult<()> {
        let mut flushed = self.flushed.lock();
        if pending.generation < *flushed {
            return Ok(());
        }
        self.snapshot.save(&pending.records).map_err(|e| {
            tracing::error!(entity = T::NAME, error = %e, "Snapshot write failed");
            StoreError::from(e)
        })?;
        *flushed = pending.generation;
        Ok(())
    }

    pub fn get(&self, id: i64, cancel: &CancellationToken) -> StoreResult<T> {
        check_cancelled(cancel)?;
        self.table
            .read()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: T::NAME,
                id,
            })
    }

    pub fn list(&self, cancel: &CancellationToken) -> StoreResult<Vec<T>> {
        check_cancelled(cancel)?;
        Ok(self.table.read().values().cloned().collect())
    }

    pub fn create(&self, record: T, cancel: &CancellationToken) -> StoreResult<T> {
        check_cancelled(cancel)?;
        let (created, pending) = {
            let mut table = self.table.write();
            let created = table.insert_new(record);
            (created, table.pending())
        };
        self.flush(pending)?;
        Ok(created)
    }

    pub fn update(&self, id: i64, record: T, cancel: &CancellationToken) -> StoreResult<T> {
        check_cancelled(cancel)?;
        let (updated, pending) = {
            let mut table = self.table.write();
            let updated = table.replace(id, record)?;
            (updated, table.pending())
        };
        self.flush(pending)?;
        Ok(updated)
    }

    pub fn delete(&self, id: i64, cancel: &CancellationToken) -> StoreResult<T> {
        check_cancelled(cancel)?;
        let (removed, pending) = {
            let mut table = self.table.write();
            let removed = table.remove(id)?;
            (removed, table.pending())
        };
        self.flush(pending)?;
        Ok(removed)
    }

    /// Current next-ID counter
    pub fn next_id(&self) -> i64 {
        self.table.read().next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::snapshot::MemorySnapshot;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: i64,
        text: String,
    }

    impl Entity for Note {
        const NAME: &'static str = "note";

        fn id(&self) -> i64 {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = id;
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: 0,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_ids_are_sequential_and_never_reused() {
        let snapshot = Arc::new(MemorySnapshot::<Note>::new());
        let notes = Collection::<Note>::new(snapshot);
        let cancel = CancellationToken::new();

        let a = notes.create(note("a"), &cancel).unwrap();
        let b = notes.create(note("b"), &cancel).unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        notes.delete(b.id, &cancel).unwrap();
        let c = notes.create(note("c"), &cancel).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_update_replaces_whole_record_and_keeps_id() {
        let notes = Collection::<Note>::new(Arc::new(MemorySnapshot::<Note>::new()));
        let cancel = CancellationToken::new();
        let a = notes.create(note("a"), &cancel).unwrap();

        let mut replacement = note("z");
        replacement.id = 99;
        let updated = notes.update(a.id, replacement, &cancel).unwrap();
        assert_eq!(updated, Note { id: 1, text: "z".into() });

        let err = notes.update(42, note("x"), &cancel).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "note", id: 42 }));
    }

    #[test]
    fn test_snapshot_round_trip_restores_next_id() {
        let snapshot = Arc::new(MemorySnapshot::<Note>::new());
        let cancel = CancellationToken::new();
        {
            let notes = Collection::<Note>::new(snapshot.clone());
            for text in ["a", "b", "c"] {
                notes.create(note(text), &cancel).unwrap();
            }
            notes.delete(2, &cancel).unwrap();
        }

        let reloaded = Collection::<Note>::new(snapshot.clone());
        assert_eq!(reloaded.load_snapshot().unwrap(), 2);
        let records = reloaded.list(&cancel).unwrap();
        assert_eq!(records, snapshot.saved().unwrap());
        assert!(records.iter().all(|r| reloaded.next_id() > r.id));
        assert_eq!(reloaded.next_id(), 4);
    }

    #[test]
    fn test_missing_snapshot_starts_empty() {
        let notes = Collection::<Note>::new(Arc::new(MemorySnapshot::<Note>::new()));
        assert_eq!(notes.load_snapshot().unwrap(), 0);
        assert_eq!(notes.next_id(), 1);
    }

    #[test]
    fn test_persistence_failure_still_commits() {
        let snapshot = Arc::new(MemorySnapshot::<Note>::new());
        let notes = Collection::<Note>::new(snapshot.clone());
        let cancel = CancellationToken::new();

        snapshot.set_failing(true);
        let err = notes.create(note("a"), &cancel).unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));

        // 内存中的修改已经生效
        assert_eq!(notes.get(1, &cancel).unwrap().text, "a");
    }

    #[test]
    fn test_cancelled_operation_does_not_mutate() {
        let notes = Collection::<Note>::new(Arc::new(MemorySnapshot::<Note>::new()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(matches!(
            notes.create(note("a"), &cancel),
            Err(StoreError::Cancelled)
        ));
        assert!(notes.read().is_empty());
    }
}
