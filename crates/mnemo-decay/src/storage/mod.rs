//! Record store contract
//!
//! The decay engine never persists anything itself. Hosts hand it records
//! and take updated records back. Concurrent reinforcement of the same
//! record must not interleave, so stores implement optimistic versioning:
//! every successful write bumps the record's version, and
//! [`RecordStore::compare_and_swap`] only writes when the caller's version
//! is still current.

pub mod memory;

use uuid::Uuid;

use crate::error::Result;
use crate::memory::types::MemoryRecord;

pub use memory::InMemoryStore;

/// A value paired with the store version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Storage collaborator for memory records
pub trait RecordStore: Send + Sync {
    /// Current snapshot of a record
    fn get(&self, id: Uuid) -> Option<Versioned<MemoryRecord>>;

    /// Insert or overwrite a record unconditionally
    fn insert(&self, record: MemoryRecord) -> Versioned<MemoryRecord>;

    /// Write `record` only if its stored version still equals
    /// `expected_version`.
    ///
    /// # Errors
    /// * [`crate::DecayError::NotFound`] if no record has this id
    /// * [`crate::DecayError::Conflict`] if another write got there first
    fn compare_and_swap(
        &self,
        expected_version: u64,
        record: MemoryRecord,
    ) -> Result<Versioned<MemoryRecord>>;

    /// Remove a record, returning it if present
    fn remove(&self, id: Uuid) -> Option<MemoryRecord>;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
