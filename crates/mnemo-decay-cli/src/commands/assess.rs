use std::path::PathBuf;

use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mnemo_decay::{DecayEngine, Tier};

use crate::error::CliResult;
use crate::output::{OutputFormat, format_confidence, format_timestamp, truncate_string};
use crate::records::{load_records, resolve_now};

#[derive(Parser)]
pub struct AssessCommand {
    #[clap(help = "Path to a JSON file of memory records")]
    pub file: PathBuf,

    #[clap(long, help = "Evaluate at this RFC 3339 timestamp instead of now")]
    pub now: Option<String>,

    #[clap(
        long,
        help = "Only show memories in this tier (direct, caveated, verify, archive_candidate)"
    )]
    pub tier: Option<String>,
}

impl AssessCommand {
    pub fn execute(&self, engine: &DecayEngine, format: OutputFormat) -> CliResult<()> {
        let tier_filter: Option<Tier> = match self.tier.as_deref() {
            Some("direct") => Some(Tier::Direct),
            Some("caveated") => Some(Tier::Caveated),
            Some("verify") => Some(Tier::Verify),
            Some("archive_candidate") => Some(Tier::ArchiveCandidate),
            Some(t) => {
                return Err(format!(
                    "Unknown tier: {t}. Use direct, caveated, verify, or archive_candidate."
                )
                .into());
            }
            None => None,
        };

        let now = resolve_now(self.now.as_deref())?;
        let outcomes = load_records(engine, &self.file, now)?;

        let mut rows = Vec::with_capacity(outcomes.len());
        for outcome in &outcomes {
            for warning in &outcome.warnings {
                eprintln!("Warning ({}): {warning}", outcome.record.id());
            }
            if outcome.record.last_reinforced() > now {
                eprintln!(
                    "Warning ({}): last reinforced at {}, after the assessment time; \
                     treating elapsed time as zero",
                    outcome.record.id(),
                    format_timestamp(&outcome.record.last_reinforced())
                );
            }
            let assessment = engine.assess_saturating(&outcome.record, now);
            if tier_filter.is_none_or(|tier| tier == assessment.tier) {
                rows.push((&outcome.record, assessment));
            }
        }

        match format {
            OutputFormat::Json => {
                let output: Vec<_> = rows
                    .iter()
                    .map(|(record, assessment)| {
                        serde_json::json!({
                            "id": record.id().to_string(),
                            "content": record.content(),
                            "category": record.category(),
                            "confidence": assessment.confidence,
                            "tier": assessment.tier,
                            "reinforcement_count": record.reinforcement_count(),
                            "last_reinforced": record.last_reinforced().to_rfc3339(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if rows.is_empty() {
                    println!("No memories found.");
                    return Ok(());
                }

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header([
                        "ID",
                        "Category",
                        "Confidence",
                        "Tier",
                        "Reinforced",
                        "Last Reinforced",
                        "Content",
                    ]);

                for (record, assessment) in &rows {
                    table.add_row([
                        &record.id().to_string()[..8],
                        record.category().as_str(),
                        &format_confidence(assessment.confidence),
                        assessment.tier.as_str(),
                        &record.reinforcement_count().to_string(),
                        &format_timestamp(&record.last_reinforced()),
                        &truncate_string(record.content(), 50),
                    ]);
                }

                println!("{table}");
                println!("\nAssessed at {} ({} memories)", format_timestamp(&now), rows.len());
            }
        }

        Ok(())
    }
}
