//! Memory records and the decay model applied to them
//!
//! Defines the memory record, the per-category decay policy, the
//! confidence function, reinforcement, tier classification and the
//! migration of legacy-shape records.

pub mod classifier;
pub mod confidence;
pub mod migration;
pub mod policy;
pub mod reinforcement;
pub mod types;

pub use classifier::{Thresholds, Tier, classify};
pub use confidence::{
    REINFORCEMENT_SLOWDOWN, adjusted_rate, current_confidence, current_confidence_saturating,
    hours_elapsed,
};
pub use migration::{MigrationOutcome, MigrationWarning, migrate};
pub use policy::{DecayPolicy, PolicyTable};
pub use reinforcement::{reinforce, reset_confidence};
pub use types::{MemoryCategory, MemoryRecord, StoredRecord};
