use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mnemo_decay::{DecayEngine, MemoryCategory};

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct PolicyCommand {
    #[clap(subcommand)]
    pub command: PolicySubcommand,
}

#[derive(Subcommand)]
pub enum PolicySubcommand {
    #[clap(about = "Show the effective decay policy and tier thresholds")]
    Show,
}

impl PolicyCommand {
    pub fn execute(&self, engine: &DecayEngine, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            PolicySubcommand::Show => Self::show(engine, format),
        }
    }

    fn show(engine: &DecayEngine, format: OutputFormat) -> CliResult<()> {
        let policies = engine.policy_table();
        let thresholds = engine.thresholds();

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "policy": *policies,
                    "thresholds": *thresholds,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("[Policy]");
                let mut policy_table = Table::new();
                policy_table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Category", "Decay Rate (/h)", "Half-life (h)", "Initial Confidence"]);

                for category in MemoryCategory::ALL {
                    let policy = policies.policy(category);
                    policy_table.add_row([
                        category.as_str(),
                        &policy.decay_rate.to_string(),
                        &format!("{:.1}", std::f64::consts::LN_2 / policy.decay_rate),
                        &policy.initial_confidence.to_string(),
                    ]);
                }

                println!("{policy_table}\n");

                println!("[Thresholds]");
                let mut threshold_table = Table::new();
                threshold_table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Tier", "Confidence Range"]);

                threshold_table.add_row(["direct", &format!(">= {}", thresholds.direct)]);
                threshold_table.add_row([
                    "caveated",
                    &format!("[{}, {})", thresholds.caveated, thresholds.direct),
                ]);
                threshold_table.add_row([
                    "verify",
                    &format!("[{}, {})", thresholds.verify, thresholds.caveated),
                ]);
                threshold_table.add_row(["archive_candidate", &format!("< {}", thresholds.verify)]);

                println!("{threshold_table}");
            }
        }

        Ok(())
    }
}
