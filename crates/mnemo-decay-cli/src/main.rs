use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mnemo_decay::DecayEngine;
use mnemo_decay::config::Config;
use mnemo_decay_cli::commands::{AssessCommand, MigrateCommand, PolicyCommand, ReinforceCommand};
use mnemo_decay_cli::error::CliResult;
use mnemo_decay_cli::output::OutputFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mnemo-decay-cli")]
#[command(about = "Inspect, migrate and reinforce mnemo memory records")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'c', global = true, help = "Path to decay config file")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Show confidence and tier for every memory in a file")]
    Assess(AssessCommand),

    #[clap(about = "Migrate legacy records in a file to the decay model")]
    Migrate(MigrateCommand),

    #[clap(about = "Record a reinforcement event for one memory")]
    Reinforce(ReinforceCommand),

    #[clap(about = "Decay policy commands")]
    Policy(PolicyCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    init_logging();

    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let config = Config::load(cli.config.as_deref())?;
    let engine = DecayEngine::from_config(&config)?;

    match &cli.command {
        Command::Assess(cmd) => cmd.execute(&engine, format),
        Command::Migrate(cmd) => cmd.execute(&engine, format),
        Command::Reinforce(cmd) => cmd.execute(&engine, format),
        Command::Policy(cmd) => cmd.execute(&engine, format),
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,mnemo_decay=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
