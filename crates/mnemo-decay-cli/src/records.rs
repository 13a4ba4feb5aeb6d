//! Reading and writing JSON record files
//!
//! A record file is a JSON array of memory records. Entries may be in
//! legacy shape; they are migrated on load.

use std::path::Path;

use chrono::{DateTime, Utc};
use mnemo_decay::{DecayEngine, MemoryRecord, MigrationOutcome, StoredRecord};

use crate::error::{CliError, CliResult};

/// Parse `--now`, defaulting to the current time
pub fn resolve_now(now: Option<&str>) -> CliResult<DateTime<Utc>> {
    match now {
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| CliError::Invalid(format!("Invalid --now timestamp '{value}': {e}"))),
        None => Ok(Utc::now()),
    }
}

pub fn read_records(path: &Path) -> CliResult<Vec<StoredRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::File {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<StoredRecord> = serde_json::from_str(&content)?;
    tracing::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read a record file and migrate every entry
pub fn load_records(
    engine: &DecayEngine,
    path: &Path,
    now: DateTime<Utc>,
) -> CliResult<Vec<MigrationOutcome>> {
    Ok(read_records(path)?
        .into_iter()
        .map(|stored| engine.migrate(stored, now))
        .collect())
}

pub fn write_records(path: &Path, records: &[MemoryRecord]) -> CliResult<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).map_err(|source| CliError::File {
        action: "write",
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_decay::MemoryCategory;

    #[test]
    fn test_resolve_now_parses_rfc3339() {
        let now = resolve_now(Some("2024-05-01T12:00:00+02:00")).unwrap();
        assert_eq!(now.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert!(resolve_now(Some("yesterday")).is_err());
    }

    #[test]
    fn test_load_migrates_legacy_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memories.json");
        std::fs::write(
            &path,
            r#"[{"content": "Has a cat", "category": "fact"}, {"content": "?"}]"#,
        )
        .unwrap();

        let engine = DecayEngine::new();
        let outcomes = load_records(&engine, &path, Utc::now()).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].record.category(), MemoryCategory::Fact);
        assert!(outcomes[0].warnings.is_empty());
        assert_eq!(outcomes[1].warnings.len(), 1);
    }

    #[test]
    fn test_write_then_load_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memories.json");
        let engine = DecayEngine::new();
        let now = Utc::now();
        let records = vec![
            engine.create(MemoryCategory::Goal, "Run 10k", now),
            engine.create(MemoryCategory::Context, "Reviewing PR", now),
        ];

        write_records(&path, &records).unwrap();
        let outcomes = load_records(&engine, &path, now).unwrap();

        assert!(outcomes.iter().all(|o| !o.migrated));
        let loaded: Vec<MemoryRecord> = outcomes.into_iter().map(|o| o.record).collect();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CliError::File { action: "read", .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
