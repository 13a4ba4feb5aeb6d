//! Mnemo Decay - confidence decay and reinforcement for long-term memories
//!
//! This crate models how a stored memory loses retrieval confidence over
//! time unless it is reinforced, and how that confidence maps to the
//! behavior tier an agent should apply when recalling it.

pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod storage;

pub use engine::{Assessment, DecayEngine, REINFORCE_CAS_ATTEMPTS_MAX};
pub use error::{DecayError, Result};
pub use memory::{
    DecayPolicy, MemoryCategory, MemoryRecord, MigrationOutcome, MigrationWarning, PolicyTable,
    StoredRecord, Thresholds, Tier,
};
