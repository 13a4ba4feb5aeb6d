//! Per-category decay policy
//!
//! Maps each [`MemoryCategory`] to a base decay rate (per hour) and the
//! confidence a new memory of that category starts with. Faster rates
//! mean faster forgetting.

use serde::{Deserialize, Serialize};

use crate::error::{DecayError, Result};
use crate::memory::types::MemoryCategory;

/// Decay parameters for a single category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayPolicy {
    /// Exponential decay constant per hour (must be > 0)
    pub decay_rate: f64,
    /// Confidence assigned at creation or full reset (0.0-1.0)
    pub initial_confidence: f64,
}

impl DecayPolicy {
    pub fn new(decay_rate: f64, initial_confidence: f64) -> Self {
        Self {
            decay_rate,
            initial_confidence,
        }
    }

    /// Check the rate is positive and the confidence lies in [0, 1]
    pub fn validate(&self) -> Result<()> {
        validate_decay_rate(self.decay_rate)?;
        validate_initial_confidence(self.initial_confidence)?;
        Ok(())
    }
}

/// Complete mapping from category to decay policy.
///
/// Always holds an entry for every category, so lookups by
/// [`MemoryCategory`] cannot miss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyTable {
    pub fact: DecayPolicy,
    pub preference: DecayPolicy,
    pub goal: DecayPolicy,
    pub event: DecayPolicy,
    pub context: DecayPolicy,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            fact: DecayPolicy::new(0.01, 0.95),
            preference: DecayPolicy::new(0.05, 0.90),
            goal: DecayPolicy::new(0.15, 0.85),
            event: DecayPolicy::new(0.25, 0.80),
            context: DecayPolicy::new(0.60, 0.80),
        }
    }
}

impl PolicyTable {
    /// Policy for a category
    pub fn policy(&self, category: MemoryCategory) -> DecayPolicy {
        match category {
            MemoryCategory::Fact => self.fact,
            MemoryCategory::Preference => self.preference,
            MemoryCategory::Goal => self.goal,
            MemoryCategory::Event => self.event,
            MemoryCategory::Context => self.context,
        }
    }

    /// Resolve a category by name, failing with `UnknownCategory` if the
    /// name is not in the table
    pub fn lookup(&self, name: &str) -> Result<(MemoryCategory, DecayPolicy)> {
        let category: MemoryCategory = name.parse()?;
        Ok((category, self.policy(category)))
    }

    /// Replace the policy for one category
    pub fn with_policy(mut self, category: MemoryCategory, policy: DecayPolicy) -> Self {
        match category {
            MemoryCategory::Fact => self.fact = policy,
            MemoryCategory::Preference => self.preference = policy,
            MemoryCategory::Goal => self.goal = policy,
            MemoryCategory::Event => self.event = policy,
            MemoryCategory::Context => self.context = policy,
        }
        self
    }

    /// The fastest-decaying category, used as the fallback for records
    /// whose category is missing or unknown. Ties go to the later category
    /// in [`MemoryCategory::ALL`].
    pub fn most_conservative(&self) -> MemoryCategory {
        MemoryCategory::ALL
            .into_iter()
            .max_by(|a, b| {
                self.policy(*a)
                    .decay_rate
                    .total_cmp(&self.policy(*b).decay_rate)
            })
            .unwrap_or(MemoryCategory::Context)
    }

    /// Validate every entry
    pub fn validate(&self) -> Result<()> {
        for category in MemoryCategory::ALL {
            self.policy(category).validate().map_err(|e| match e {
                DecayError::InvalidConfig(msg) => {
                    DecayError::InvalidConfig(format!("policy for {category}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

pub(crate) fn validate_decay_rate(decay_rate: f64) -> Result<f64> {
    if decay_rate.is_finite() && decay_rate > 0.0 {
        Ok(decay_rate)
    } else {
        Err(DecayError::InvalidConfig(format!(
            "decay_rate must be finite and greater than 0, got {decay_rate}"
        )))
    }
}

pub(crate) fn validate_initial_confidence(initial_confidence: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&initial_confidence) {
        Ok(initial_confidence)
    } else {
        Err(DecayError::InvalidConfig(format!(
            "initial_confidence must be within [0, 1], got {initial_confidence}"
        )))
    }
}
