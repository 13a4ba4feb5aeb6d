//! Memory record types for the decay engine
//!
//! Defines the canonical [`MemoryRecord`] together with the legacy-shape
//! [`StoredRecord`] that storage hands back before migration.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DecayError, Result};
use crate::memory::policy::{PolicyTable, validate_decay_rate, validate_initial_confidence};

/// Kind of remembered information. Determines the base decay rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryCategory {
    /// Stable facts about the user or world
    Fact,
    /// Likes, dislikes, style choices
    Preference,
    /// Things the user is working towards
    Goal,
    /// Something that happened at a point in time
    Event,
    /// Short-lived conversational context
    Context,
}

impl MemoryCategory {
    /// Every category, slowest-decaying first under the default policy
    pub const ALL: [MemoryCategory; 5] = [
        MemoryCategory::Fact,
        MemoryCategory::Preference,
        MemoryCategory::Goal,
        MemoryCategory::Event,
        MemoryCategory::Context,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryCategory::Fact => "fact",
            MemoryCategory::Preference => "preference",
            MemoryCategory::Goal => "goal",
            MemoryCategory::Event => "event",
            MemoryCategory::Context => "context",
        }
    }
}

impl fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryCategory {
    type Err = DecayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fact" => Ok(MemoryCategory::Fact),
            "preference" => Ok(MemoryCategory::Preference),
            "goal" => Ok(MemoryCategory::Goal),
            "event" => Ok(MemoryCategory::Event),
            "context" => Ok(MemoryCategory::Context),
            _ => Err(DecayError::UnknownCategory(s.to_string())),
        }
    }
}

/// A single memory unit with its decay metadata.
///
/// Current confidence is never stored here; it is computed on demand from
/// these fields and the wall clock (see [`crate::memory::current_confidence`]).
///
/// Deserialization goes through [`StoredRecord`] and rejects incomplete or
/// out-of-range records. Use [`crate::memory::migrate`] to repair them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct MemoryRecord {
    pub(crate) id: Uuid,
    pub(crate) content: String,
    pub(crate) category: MemoryCategory,
    pub(crate) initial_confidence: f64,
    pub(crate) decay_rate: f64,
    pub(crate) reinforcement_count: u32,
    pub(crate) last_reinforced: DateTime<Utc>,
    pub(crate) created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Create a new memory using the policy defaults for its category
    pub fn new(
        category: MemoryCategory,
        content: impl Into<String>,
        now: DateTime<Utc>,
        policies: &PolicyTable,
    ) -> Self {
        let policy = policies.policy(category);
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            category,
            initial_confidence: policy.initial_confidence,
            decay_rate: policy.decay_rate,
            reinforcement_count: 0,
            last_reinforced: now,
            created_at: now,
        }
    }

    /// Override the starting confidence (must lie in [0, 1])
    pub fn with_initial_confidence(mut self, initial_confidence: f64) -> Result<Self> {
        self.initial_confidence = validate_initial_confidence(initial_confidence)?;
        Ok(self)
    }

    /// Override the category's base decay rate (must be finite and > 0)
    pub fn with_decay_rate(mut self, decay_rate: f64) -> Result<Self> {
        self.decay_rate = validate_decay_rate(decay_rate)?;
        Ok(self)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> MemoryCategory {
        self.category
    }

    pub fn initial_confidence(&self) -> f64 {
        self.initial_confidence
    }

    /// Base decay constant per hour, before reinforcement slowdown
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn reinforcement_count(&self) -> u32 {
        self.reinforcement_count
    }

    pub fn last_reinforced(&self) -> DateTime<Utc> {
        self.last_reinforced
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A memory as read back from storage, before migration.
///
/// Every field is optional so that records written before the decay model
/// existed still deserialize. The category is kept as free text because
/// older stores may hold names the policy table does not know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decay_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reinforcement_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reinforced: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<MemoryRecord> for StoredRecord {
    fn from(record: MemoryRecord) -> Self {
        Self {
            id: Some(record.id),
            content: Some(record.content),
            category: Some(record.category.as_str().to_string()),
            initial_confidence: Some(record.initial_confidence),
            decay_rate: Some(record.decay_rate),
            reinforcement_count: Some(record.reinforcement_count),
            last_reinforced: Some(record.last_reinforced),
            created_at: Some(record.created_at),
        }
    }
}

impl TryFrom<StoredRecord> for MemoryRecord {
    type Error = DecayError;

    fn try_from(stored: StoredRecord) -> Result<Self> {
        fn require<T>(value: Option<T>, field: &str) -> Result<T> {
            value.ok_or_else(|| {
                DecayError::InvalidConfig(format!("Memory record is missing '{field}'"))
            })
        }

        Ok(Self {
            id: require(stored.id, "id")?,
            content: require(stored.content, "content")?,
            category: require(stored.category, "category")?.parse::<MemoryCategory>()?,
            initial_confidence: validate_initial_confidence(require(
                stored.initial_confidence,
                "initial_confidence",
            )?)?,
            decay_rate: validate_decay_rate(require(stored.decay_rate, "decay_rate")?)?,
            reinforcement_count: require(stored.reinforcement_count, "reinforcement_count")?,
            last_reinforced: require(stored.last_reinforced, "last_reinforced")?,
            created_at: require(stored.created_at, "created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parses_case_insensitively() {
        assert_eq!(
            "Fact".parse::<MemoryCategory>().unwrap(),
            MemoryCategory::Fact
        );
        assert_eq!(
            " CONTEXT ".parse::<MemoryCategory>().unwrap(),
            MemoryCategory::Context
        );
    }

    #[test]
    fn test_unknown_category_is_reported() {
        let err = "hobby".parse::<MemoryCategory>().unwrap_err();
        assert!(matches!(err, DecayError::UnknownCategory(name) if name == "hobby"));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&MemoryCategory::Preference).unwrap();
        assert_eq!(json, "\"preference\"");
    }

    #[test]
    fn test_memory_new_uses_policy_defaults() {
        let policies = PolicyTable::default();
        let now = Utc::now();
        let memory = MemoryRecord::new(MemoryCategory::Goal, "Ship v1", now, &policies);

        let policy = policies.policy(MemoryCategory::Goal);
        assert_eq!(memory.decay_rate(), policy.decay_rate);
        assert_eq!(memory.initial_confidence(), policy.initial_confidence);
        assert_eq!(memory.reinforcement_count(), 0);
        assert_eq!(memory.last_reinforced(), now);
        assert_eq!(memory.created_at(), now);
        assert_eq!(memory.content(), "Ship v1");
    }

    #[test]
    fn test_overrides_are_validated() {
        let policies = PolicyTable::default();
        let memory = MemoryRecord::new(MemoryCategory::Fact, "x", Utc::now(), &policies);

        assert!(memory.clone().with_initial_confidence(1.2).is_err());
        assert!(memory.clone().with_initial_confidence(f64::NAN).is_err());
        assert!(memory.clone().with_decay_rate(0.0).is_err());
        assert!(memory.clone().with_decay_rate(-0.1).is_err());

        let tuned = memory
            .with_initial_confidence(0.5)
            .and_then(|m| m.with_decay_rate(0.2))
            .unwrap();
        assert_eq!(tuned.initial_confidence(), 0.5);
        assert_eq!(tuned.decay_rate(), 0.2);
    }

    #[test]
    fn test_memory_serialization() {
        let memory = MemoryRecord::new(
            MemoryCategory::Event,
            "Went hiking",
            Utc::now(),
            &PolicyTable::default(),
        );

        let json = serde_json::to_string(&memory).expect("Failed to serialize memory");
        let deserialized: MemoryRecord =
            serde_json::from_str(&json).expect("Failed to deserialize memory");

        assert_eq!(memory, deserialized);
    }

    #[test]
    fn test_memory_deserialization_rejects_bad_decay_values() {
        let memory = MemoryRecord::new(
            MemoryCategory::Fact,
            "Allergic to peanuts",
            Utc::now(),
            &PolicyTable::default(),
        );

        for (field, value) in [
            ("decay_rate", -0.5),
            ("decay_rate", 0.0),
            ("initial_confidence", 1.5),
            ("initial_confidence", -0.1),
        ] {
            let mut json = serde_json::to_value(&memory).unwrap();
            json[field] = serde_json::json!(value);
            let result: std::result::Result<MemoryRecord, _> = serde_json::from_value(json);
            assert!(result.is_err(), "{field} = {value} should be rejected");
        }
    }

    #[test]
    fn test_memory_deserialization_rejects_incomplete_records() {
        let legacy = r#"{"content": "legacy", "category": "fact"}"#;
        let err = serde_json::from_str::<MemoryRecord>(legacy).unwrap_err();
        assert!(err.to_string().contains("missing 'id'"));

        let memory = MemoryRecord::new(
            MemoryCategory::Goal,
            "Ship v1",
            Utc::now(),
            &PolicyTable::default(),
        );
        let mut json = serde_json::to_value(&memory).unwrap();
        json["category"] = serde_json::json!("hobby");
        assert!(serde_json::from_value::<MemoryRecord>(json).is_err());
    }

    #[test]
    fn test_stored_record_accepts_missing_fields() {
        let stored: StoredRecord =
            serde_json::from_str(r#"{"content": "legacy", "category": "fact"}"#).unwrap();
        assert_eq!(stored.content.as_deref(), Some("legacy"));
        assert!(stored.decay_rate.is_none());
        assert!(stored.created_at.is_none());
    }

    #[test]
    fn test_stored_record_from_memory_is_complete() {
        let memory = MemoryRecord::new(
            MemoryCategory::Fact,
            "Name is Ada",
            Utc::now(),
            &PolicyTable::default(),
        );
        let stored = StoredRecord::from(memory.clone());

        assert_eq!(stored.id, Some(memory.id()));
        assert_eq!(stored.category.as_deref(), Some("fact"));
        assert_eq!(stored.reinforcement_count, Some(0));
        assert_eq!(stored.last_reinforced, Some(memory.last_reinforced()));
    }
}
