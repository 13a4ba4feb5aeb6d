//! Confidence calculation for memory records
//!
//! Confidence is a derived value in [0, 1]. It starts at the record's
//! initial confidence whenever the record is reinforced and decays
//! exponentially from there, more slowly the more often the record has
//! been reinforced.

use chrono::{DateTime, Utc};

use crate::error::{DecayError, Result};
use crate::memory::types::MemoryRecord;

/// How much each reinforcement event slows decay.
pub const REINFORCEMENT_SLOWDOWN: f64 = 0.3;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Hours since the record was last reinforced, at microsecond resolution.
///
/// Fails with [`DecayError::InvalidTime`] when `now` precedes the last
/// reinforcement; negative elapsed time is never produced.
pub fn hours_elapsed(record: &MemoryRecord, now: DateTime<Utc>) -> Result<f64> {
    if now < record.last_reinforced {
        return Err(DecayError::InvalidTime {
            now,
            last_reinforced: record.last_reinforced,
        });
    }
    let elapsed = now - record.last_reinforced;
    // Microseconds overflow i64 after roughly 292,000 years
    Ok(match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / MICROS_PER_HOUR,
        None => elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR,
    })
}

/// Effective decay rate after reinforcement slowdown.
///
/// Formula: decay_rate / (1 + 0.3 * reinforcement_count)
pub fn adjusted_rate(record: &MemoryRecord) -> f64 {
    record.decay_rate / (1.0 + REINFORCEMENT_SLOWDOWN * f64::from(record.reinforcement_count))
}

/// Calculate the current confidence of a memory.
///
/// Formula: initial_confidence * exp(-adjusted_rate * hours_elapsed), clamped to [0, 1]
///
/// This means:
/// - Reading at the moment of reinforcement returns the initial confidence
/// - Confidence never rises as `now` advances
/// - Each reinforcement stretches the curve out
///
/// The function has no side effects; the record is not touched.
pub fn current_confidence(record: &MemoryRecord, now: DateTime<Utc>) -> Result<f64> {
    let hours = hours_elapsed(record, now)?;
    let confidence = record.initial_confidence * (-adjusted_rate(record) * hours).exp();
    Ok(confidence.clamp(0.0, 1.0))
}

/// Like [`current_confidence`], but a `now` earlier than the last
/// reinforcement is treated as zero elapsed time. The skew is reported
/// as a warning event.
pub fn current_confidence_saturating(record: &MemoryRecord, now: DateTime<Utc>) -> f64 {
    match current_confidence(record, now) {
        Ok(confidence) => confidence,
        Err(err) => {
            tracing::warn!(memory_id = %record.id, error = %err, "Clock skew, clamping elapsed time to zero");
            record.initial_confidence.clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::policy::PolicyTable;
    use crate::memory::types::MemoryCategory;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    fn create_test_memory(
        category: MemoryCategory,
        initial_confidence: f64,
        reinforcement_count: u32,
    ) -> MemoryRecord {
        let mut memory = MemoryRecord::new(category, "Test", base_time(), &PolicyTable::default())
            .with_initial_confidence(initial_confidence)
            .unwrap();
        memory.reinforcement_count = reinforcement_count;
        memory
    }

    #[test]
    fn test_fresh_memory_has_initial_confidence() {
        let memory = create_test_memory(MemoryCategory::Goal, 0.85, 0);
        assert_eq!(current_confidence(&memory, base_time()).unwrap(), 0.85);
    }

    #[test]
    fn test_adjusted_rate_without_reinforcement_is_base_rate() {
        let memory = create_test_memory(MemoryCategory::Event, 0.8, 0);
        assert_eq!(adjusted_rate(&memory), 0.25);
    }

    #[test]
    fn test_adjusted_rate_slows_with_reinforcement() {
        let memory = create_test_memory(MemoryCategory::Fact, 0.95, 10);
        assert!((adjusted_rate(&memory) - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_context_memory_after_two_hours() {
        let memory = create_test_memory(MemoryCategory::Context, 0.8, 0);
        let confidence = current_confidence(&memory, base_time() + Duration::hours(2)).unwrap();
        assert!((confidence - 0.8 * (-1.2f64).exp()).abs() < 1e-12);
        assert!((confidence - 0.241).abs() < 1e-3);
    }

    #[test]
    fn test_fact_memory_after_thirty_days() {
        let memory = create_test_memory(MemoryCategory::Fact, 0.95, 0);
        let confidence = current_confidence(&memory, base_time() + Duration::hours(720)).unwrap();
        assert!((confidence - 0.95 * (-7.2f64).exp()).abs() < 1e-12);
        assert!((confidence - 0.00070).abs() < 2e-5);
    }

    #[test]
    fn test_reinforced_fact_memory_after_thirty_days() {
        let memory = create_test_memory(MemoryCategory::Fact, 0.95, 10);
        let confidence = current_confidence(&memory, base_time() + Duration::hours(720)).unwrap();
        assert!((confidence - 0.157).abs() < 1e-3);
    }

    #[test]
    fn test_confidence_decreases_over_time() {
        let memory = create_test_memory(MemoryCategory::Preference, 0.9, 0);
        let earlier = current_confidence(&memory, base_time() + Duration::hours(5)).unwrap();
        let later = current_confidence(&memory, base_time() + Duration::hours(6)).unwrap();
        assert!(later < earlier);
    }

    #[test]
    fn test_partial_hours_count() {
        let memory = create_test_memory(MemoryCategory::Context, 0.8, 0);
        let hours = hours_elapsed(&memory, base_time() + Duration::minutes(90)).unwrap();
        assert!((hours - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_sub_millisecond_steps_still_decay() {
        let memory = create_test_memory(MemoryCategory::Context, 0.8, 0);
        let at = base_time() + Duration::hours(1);
        let earlier = current_confidence(&memory, at).unwrap();
        let later = current_confidence(&memory, at + Duration::microseconds(250)).unwrap();
        assert!(later < earlier);
    }

    #[test]
    fn test_time_before_reinforcement_is_rejected() {
        let memory = create_test_memory(MemoryCategory::Fact, 0.9, 0);
        let err = current_confidence(&memory, base_time() - Duration::seconds(1)).unwrap_err();
        assert!(matches!(err, DecayError::InvalidTime { .. }));
    }

    #[test]
    fn test_saturating_read_clamps_skew() {
        let memory = create_test_memory(MemoryCategory::Fact, 0.9, 0);
        let confidence = current_confidence_saturating(&memory, base_time() - Duration::hours(3));
        assert_eq!(confidence, 0.9);
    }

    #[test]
    fn test_confidence_is_idempotent() {
        let memory = create_test_memory(MemoryCategory::Goal, 0.85, 2);
        let now = base_time() + Duration::hours(12);
        let first = current_confidence(&memory, now).unwrap();
        let second = current_confidence(&memory, now).unwrap();
        assert_eq!(first, second);
        assert_eq!(memory.reinforcement_count, 2);
    }
}
