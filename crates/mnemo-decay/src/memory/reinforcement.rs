//! Reinforcement of memory records
//!
//! Reinforcing a memory restarts its decay clock and bumps its
//! reinforcement count, which slows every later stretch of decay.

use chrono::{DateTime, Utc};

use crate::error::{DecayError, Result};
use crate::memory::policy::PolicyTable;
use crate::memory::types::MemoryRecord;

/// Record a reinforcement event at `now`.
///
/// Sets `last_reinforced = now` and increments the reinforcement count.
/// Initial confidence and decay rate are left alone. Fails with
/// [`DecayError::InvalidTime`] when `now` is earlier than the last
/// reinforcement.
pub fn reinforce(record: &MemoryRecord, now: DateTime<Utc>) -> Result<MemoryRecord> {
    if now < record.last_reinforced {
        return Err(DecayError::InvalidTime {
            now,
            last_reinforced: record.last_reinforced,
        });
    }

    let mut updated = record.clone();
    updated.last_reinforced = now;
    updated.reinforcement_count = record.reinforcement_count.saturating_add(1);
    Ok(updated)
}

/// Full reset: reinforce and restore the category's default initial
/// confidence. Used when the user explicitly re-confirms a memory.
pub fn reset_confidence(
    record: &MemoryRecord,
    now: DateTime<Utc>,
    policies: &PolicyTable,
) -> Result<MemoryRecord> {
    let mut updated = reinforce(record, now)?;
    updated.initial_confidence = policies.policy(record.category).initial_confidence;
    Ok(updated)
}
