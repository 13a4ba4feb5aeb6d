//! Migration of legacy-shape records into the decay model
//!
//! Records written before the decay model existed lack some or all of the
//! decay fields. [`migrate`] fills them from the policy table. It is a pure
//! transform and a no-op on records that are already complete, so it is
//! safe to run on every load.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::memory::policy::{PolicyTable, validate_decay_rate, validate_initial_confidence};
use crate::memory::types::{MemoryCategory, MemoryRecord, StoredRecord};

/// Something migration had to paper over. Returned alongside the record so
/// the caller can surface it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrationWarning {
    /// Category name not in the policy table
    #[error("Unknown memory category '{name}', falling back to {fallback}")]
    UnknownCategory {
        name: String,
        fallback: MemoryCategory,
    },

    /// No category stored at all
    #[error("Missing memory category, falling back to {fallback}")]
    MissingCategory { fallback: MemoryCategory },

    /// Stored initial confidence outside [0, 1]
    #[error("Invalid initial confidence {value}, replaced with {replacement}")]
    InvalidInitialConfidence { value: f64, replacement: f64 },

    /// Stored decay rate not finite and positive
    #[error("Invalid decay rate {value}, replaced with {replacement}")]
    InvalidDecayRate { value: f64, replacement: f64 },
}

/// Result of migrating a single record
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    /// The canonical record
    pub record: MemoryRecord,
    /// False when the input was already complete and nothing was filled in
    pub migrated: bool,
    /// Fallbacks applied along the way
    pub warnings: Vec<MigrationWarning>,
}

/// Bring a stored record into canonical shape.
///
/// Missing fields are filled as follows:
/// - category: the policy table's most conservative category, with a warning
/// - decay_rate / initial_confidence: the category's policy defaults
/// - reinforcement_count: 0
/// - created_at: last_reinforced if present, otherwise `now`
/// - last_reinforced: created_at
/// - id: a fresh v4 UUID, content: empty
///
/// Present but invalid decay values are replaced by the policy defaults
/// and reported. Everything else that is present is kept as-is.
pub fn migrate(stored: StoredRecord, policies: &PolicyTable, now: DateTime<Utc>) -> MigrationOutcome {
    let mut migrated = false;
    let mut warnings = Vec::new();

    let category = match stored.category.as_deref() {
        Some(name) => match policies.lookup(name) {
            Ok((category, _)) => category,
            Err(_) => {
                let fallback = policies.most_conservative();
                warnings.push(MigrationWarning::UnknownCategory {
                    name: name.to_string(),
                    fallback,
                });
                migrated = true;
                fallback
            }
        },
        None => {
            let fallback = policies.most_conservative();
            warnings.push(MigrationWarning::MissingCategory { fallback });
            migrated = true;
            fallback
        }
    };
    let policy = policies.policy(category);

    let decay_rate = match stored.decay_rate {
        Some(value) => match validate_decay_rate(value) {
            Ok(rate) => rate,
            Err(_) => {
                warnings.push(MigrationWarning::InvalidDecayRate {
                    value,
                    replacement: policy.decay_rate,
                });
                migrated = true;
                policy.decay_rate
            }
        },
        None => {
            migrated = true;
            policy.decay_rate
        }
    };

    let initial_confidence = match stored.initial_confidence {
        Some(value) => match validate_initial_confidence(value) {
            Ok(confidence) => confidence,
            Err(_) => {
                warnings.push(MigrationWarning::InvalidInitialConfidence {
                    value,
                    replacement: policy.initial_confidence,
                });
                migrated = true;
                policy.initial_confidence
            }
        },
        None => {
            migrated = true;
            policy.initial_confidence
        }
    };

    let created_at = stored.created_at.unwrap_or_else(|| {
        migrated = true;
        stored.last_reinforced.unwrap_or(now)
    });
    let last_reinforced = stored.last_reinforced.unwrap_or_else(|| {
        migrated = true;
        created_at
    });
    let reinforcement_count = stored.reinforcement_count.unwrap_or_else(|| {
        migrated = true;
        0
    });
    let id = stored.id.unwrap_or_else(|| {
        migrated = true;
        Uuid::new_v4()
    });
    let content = stored.content.unwrap_or_else(|| {
        migrated = true;
        String::new()
    });

    for warning in &warnings {
        tracing::warn!(memory_id = %id, "{warning}");
    }
    if migrated {
        tracing::debug!(memory_id = %id, %category, "Migrated legacy memory record");
    }

    MigrationOutcome {
        record: MemoryRecord {
            id,
            content,
            category,
            initial_confidence,
            decay_rate,
            reinforcement_count,
            last_reinforced,
            created_at,
        },
        migrated,
        warnings,
    }
}
