//! In-memory record store backed by a concurrent hash map
//!
//! Each key is guarded by its shard lock, so a compare-and-swap reads and
//! writes the version as one unit.

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{DecayError, Result};
use crate::memory::types::MemoryRecord;
use crate::storage::{RecordStore, Versioned};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<Uuid, Versioned<MemoryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-canonical records, each at version 1
    pub fn from_records(records: impl IntoIterator<Item = MemoryRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Snapshot of every record, in no particular order
    pub fn records(&self) -> Vec<MemoryRecord> {
        self.records
            .iter()
            .map(|entry| entry.value().value.clone())
            .collect()
    }
}

impl RecordStore for InMemoryStore {
    fn get(&self, id: Uuid) -> Option<Versioned<MemoryRecord>> {
        self.records.get(&id).map(|entry| entry.value().clone())
    }

    fn insert(&self, record: MemoryRecord) -> Versioned<MemoryRecord> {
        let mut entry = self.records.entry(record.id()).or_insert(Versioned {
            version: 0,
            value: record.clone(),
        });
        entry.version += 1;
        entry.value = record;
        entry.clone()
    }

    fn compare_and_swap(
        &self,
        expected_version: u64,
        record: MemoryRecord,
    ) -> Result<Versioned<MemoryRecord>> {
        let id = record.id();
        let mut entry = self
            .records
            .get_mut(&id)
            .ok_or(DecayError::NotFound(id))?;

        if entry.version != expected_version {
            return Err(DecayError::Conflict {
                id,
                expected: expected_version,
                actual: entry.version,
            });
        }

        entry.version += 1;
        entry.value = record;
        Ok(entry.clone())
    }

    fn remove(&self, id: Uuid) -> Option<MemoryRecord> {
        self.records.remove(&id).map(|(_, versioned)| versioned.value)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
