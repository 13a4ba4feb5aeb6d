use std::path::PathBuf;

use clap::Parser;
use mnemo_decay::{DecayEngine, MemoryRecord};

use crate::error::CliResult;
use crate::output::OutputFormat;
use crate::records::{load_records, resolve_now, write_records};

#[derive(Parser)]
pub struct MigrateCommand {
    #[clap(help = "Path to a JSON file of memory records")]
    pub file: PathBuf,

    #[clap(long, short, help = "Write migrated records here instead of in place")]
    pub output: Option<PathBuf>,

    #[clap(long, help = "Timestamp for records without created_at (RFC 3339)")]
    pub now: Option<String>,
}

impl MigrateCommand {
    pub fn execute(&self, engine: &DecayEngine, format: OutputFormat) -> CliResult<()> {
        let now = resolve_now(self.now.as_deref())?;
        let outcomes = load_records(engine, &self.file, now)?;

        let migrated = outcomes.iter().filter(|o| o.migrated).count();
        let warnings: Vec<String> = outcomes
            .iter()
            .flat_map(|o| {
                o.warnings
                    .iter()
                    .map(move |w| format!("{}: {w}", o.record.id()))
            })
            .collect();

        let records: Vec<MemoryRecord> = outcomes.into_iter().map(|o| o.record).collect();
        let destination = self.output.as_ref().unwrap_or(&self.file);
        write_records(destination, &records)?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "total": records.len(),
                    "migrated": migrated,
                    "warnings": warnings,
                    "output": destination.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!(
                    "Migrated {migrated} of {} records -> {}",
                    records.len(),
                    destination.display()
                );
                for warning in &warnings {
                    println!("  warning: {warning}");
                }
            }
        }

        Ok(())
    }
}
