//! Decay engine: the hosting application's entry point
//!
//! Holds the two pieces of process-wide state, the policy table and the
//! classification thresholds, as immutable snapshots behind a single swap
//! point each. Every other operation is a pure function of its inputs and
//! the current snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{DecayError, Result};
use crate::memory::classifier::{Thresholds, Tier};
use crate::memory::migration::{MigrationOutcome, migrate};
use crate::memory::policy::PolicyTable;
use crate::memory::types::{MemoryCategory, MemoryRecord, StoredRecord};
use crate::memory::{confidence, reinforcement};
use crate::storage::{RecordStore, Versioned};

/// Maximum compare-and-swap attempts for a stored reinforcement before the
/// conflict is returned to the caller
pub const REINFORCE_CAS_ATTEMPTS_MAX: usize = 8;

/// What the agent layer receives for a recalled memory
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    pub confidence: f64,
    pub tier: Tier,
}

/// Decay and reinforcement engine
#[derive(Debug, Default)]
pub struct DecayEngine {
    policies: RwLock<Arc<PolicyTable>>,
    thresholds: RwLock<Arc<Thresholds>>,
}

impl DecayEngine {
    /// Create an engine with the default policy table and thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit, validated tables
    pub fn with_tables(policies: PolicyTable, thresholds: Thresholds) -> Result<Self> {
        policies.validate()?;
        thresholds.validate()?;
        Ok(Self {
            policies: RwLock::new(Arc::new(policies)),
            thresholds: RwLock::new(Arc::new(thresholds)),
        })
    }

    /// Create an engine from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_tables(config.policy_table()?, config.thresholds()?)
    }

    /// Current policy table snapshot
    pub fn policy_table(&self) -> Arc<PolicyTable> {
        Arc::clone(&self.policies.read())
    }

    /// Current thresholds snapshot
    pub fn thresholds(&self) -> Arc<Thresholds> {
        Arc::clone(&self.thresholds.read())
    }

    /// Create a new record with the current policy for its category
    pub fn create(
        &self,
        category: MemoryCategory,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> MemoryRecord {
        MemoryRecord::new(category, content, now, &self.policy_table())
    }

    /// Current confidence of a record. Read-only.
    pub fn compute_confidence(&self, record: &MemoryRecord, now: DateTime<Utc>) -> Result<f64> {
        confidence::current_confidence(record, now)
    }

    /// Record a reinforcement event
    pub fn reinforce(&self, record: &MemoryRecord, now: DateTime<Utc>) -> Result<MemoryRecord> {
        let updated = reinforcement::reinforce(record, now)?;
        tracing::debug!(
            memory_id = %updated.id(),
            reinforcement_count = updated.reinforcement_count(),
            "Reinforced memory"
        );
        Ok(updated)
    }

    /// Reinforce and restore the category's default initial confidence
    pub fn reset_confidence(
        &self,
        record: &MemoryRecord,
        now: DateTime<Utc>,
    ) -> Result<MemoryRecord> {
        let updated = reinforcement::reset_confidence(record, now, &self.policy_table())?;
        tracing::debug!(
            memory_id = %updated.id(),
            initial_confidence = updated.initial_confidence(),
            "Reset memory confidence"
        );
        Ok(updated)
    }

    /// Tier for a confidence value under the current thresholds
    pub fn classify(&self, confidence: f64) -> Tier {
        self.thresholds().classify(confidence)
    }

    /// Confidence and tier for a recalled record
    pub fn assess(&self, record: &MemoryRecord, now: DateTime<Utc>) -> Result<Assessment> {
        let confidence = self.compute_confidence(record, now)?;
        Ok(Assessment {
            confidence,
            tier: self.classify(confidence),
        })
    }

    /// Like [`DecayEngine::assess`], but clock skew reads as zero elapsed time
    /// instead of failing
    pub fn assess_saturating(&self, record: &MemoryRecord, now: DateTime<Utc>) -> Assessment {
        let confidence = confidence::current_confidence_saturating(record, now);
        Assessment {
            confidence,
            tier: self.classify(confidence),
        }
    }

    /// Bring a stored record into canonical shape using the current policy
    pub fn migrate(&self, stored: StoredRecord, now: DateTime<Utc>) -> MigrationOutcome {
        migrate(stored, &self.policy_table(), now)
    }

    /// Replace the policy table. Readers see either the old table or the
    /// new one, never a mix.
    pub fn update_policy_table(&self, policies: PolicyTable) -> Result<()> {
        policies.validate()?;
        *self.policies.write() = Arc::new(policies);
        tracing::debug!(?policies, "Policy table updated");
        Ok(())
    }

    /// Replace the classification thresholds after validating that they
    /// partition [0, 1]
    pub fn update_thresholds(&self, thresholds: Thresholds) -> Result<()> {
        thresholds.validate()?;
        *self.thresholds.write() = Arc::new(thresholds);
        tracing::debug!(?thresholds, "Thresholds updated");
        Ok(())
    }

    /// Reload both tables from configuration. Nothing is swapped unless
    /// both validate.
    pub fn apply_config(&self, config: &Config) -> Result<()> {
        let policies = config.policy_table()?;
        let thresholds = config.thresholds()?;
        self.update_policy_table(policies)?;
        self.update_thresholds(thresholds)?;
        tracing::info!("Applied decay configuration");
        Ok(())
    }

    /// Reinforce a record held by `store`, retrying on version conflicts
    pub fn reinforce_stored<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Versioned<MemoryRecord>> {
        self.update_stored(store, id, |record| self.reinforce(record, now))
    }

    /// Full reset of a record held by `store`, retrying on version conflicts
    pub fn reset_stored<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Versioned<MemoryRecord>> {
        self.update_stored(store, id, |record| self.reset_confidence(record, now))
    }

    fn update_stored<S, F>(&self, store: &S, id: Uuid, update: F) -> Result<Versioned<MemoryRecord>>
    where
        S: RecordStore + ?Sized,
        F: Fn(&MemoryRecord) -> Result<MemoryRecord>,
    {
        let mut last_conflict = None;
        for attempt in 1..=REINFORCE_CAS_ATTEMPTS_MAX {
            let snapshot = store.get(id).ok_or(DecayError::NotFound(id))?;
            let updated = update(&snapshot.value)?;
            match store.compare_and_swap(snapshot.version, updated) {
                Ok(written) => return Ok(written),
                Err(err @ DecayError::Conflict { .. }) => {
                    tracing::debug!(memory_id = %id, attempt, "Concurrent write, retrying");
                    last_conflict = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        tracing::warn!(memory_id = %id, "Giving up after repeated version conflicts");
        Err(last_conflict.unwrap_or(DecayError::NotFound(id)))
    }
}
