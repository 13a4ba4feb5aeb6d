use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;
use mnemo_decay::DecayEngine;
use mnemo_decay::storage::{InMemoryStore, RecordStore};
use uuid::Uuid;

use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, format_confidence, format_timestamp};
use crate::records::{load_records, resolve_now, write_records};

#[derive(Parser)]
pub struct ReinforceCommand {
    #[clap(help = "Path to a JSON file of memory records")]
    pub file: PathBuf,

    #[clap(help = "Memory ID to reinforce (UUID format)")]
    pub id: String,

    #[clap(long, help = "Also restore the category's default initial confidence")]
    pub full: bool,

    #[clap(long, help = "Reinforcement time (RFC 3339), defaults to now")]
    pub now: Option<String>,
}

impl ReinforceCommand {
    pub fn execute(&self, engine: &DecayEngine, format: OutputFormat) -> CliResult<()> {
        let id = Uuid::parse_str(&self.id).map_err(|e| format!("Invalid UUID: {e}"))?;
        let now = resolve_now(self.now.as_deref())?;

        let records: Vec<_> = load_records(engine, &self.file, now)?
            .into_iter()
            .map(|o| o.record)
            .collect();
        let order: Vec<Uuid> = records.iter().map(|r| r.id()).collect();
        let mut seen = HashSet::with_capacity(order.len());
        if let Some(duplicate) = order.iter().find(|id| !seen.insert(**id)) {
            return Err(CliError::DuplicateId {
                id: *duplicate,
                path: self.file.clone(),
            });
        }
        let store = InMemoryStore::from_records(records);

        let written = if self.full {
            engine.reset_stored(&store, id, now)?
        } else {
            engine.reinforce_stored(&store, id, now)?
        };

        let updated = order
            .iter()
            .map(|id| {
                store
                    .get(*id)
                    .map(|v| v.value)
                    .ok_or_else(|| CliError::Invalid(format!("Memory vanished during update: {id}")))
            })
            .collect::<CliResult<Vec<_>>>()?;
        write_records(&self.file, &updated)?;

        let record = written.value;
        let assessment = engine.assess(&record, now)?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "id": record.id().to_string(),
                    "reinforcement_count": record.reinforcement_count(),
                    "initial_confidence": record.initial_confidence(),
                    "last_reinforced": record.last_reinforced().to_rfc3339(),
                    "confidence": assessment.confidence,
                    "tier": assessment.tier,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                let action = if self.full { "Reset" } else { "Reinforced" };
                println!("{action} memory {}", record.id());
                println!("  Reinforcements: {}", record.reinforcement_count());
                println!("  Last reinforced: {}", format_timestamp(&record.last_reinforced()));
                println!(
                    "  Confidence: {} ({})",
                    format_confidence(assessment.confidence),
                    assessment.tier
                );
            }
        }

        Ok(())
    }
}
