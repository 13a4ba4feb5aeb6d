//! Error types for Mnemo Decay

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Main error type for decay engine operations
#[derive(Error, Debug)]
pub enum DecayError {
    /// A time-sensitive operation was handed a timestamp earlier than the
    /// record's last reinforcement (clock skew or out-of-order events)
    #[error("Invalid time: {now} is earlier than last reinforcement at {last_reinforced}")]
    InvalidTime {
        now: DateTime<Utc>,
        last_reinforced: DateTime<Utc>,
    },

    /// Malformed policy table, thresholds or record overrides
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Category name that is not part of the policy table
    #[error("Unknown memory category: {0}")]
    UnknownCategory(String),

    /// Record missing from a record store
    #[error("Memory not found: {0}")]
    NotFound(Uuid),

    /// Optimistic version check failed during a store write
    #[error("Version conflict on memory {id}: expected version {expected}, found {actual}")]
    Conflict { id: Uuid, expected: u64, actual: u64 },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for decay engine operations
pub type Result<T> = std::result::Result<T, DecayError>;
