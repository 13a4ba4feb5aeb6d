pub mod commands;
pub mod error;
pub mod output;
pub mod records;

pub use commands::{AssessCommand, MigrateCommand, PolicyCommand, ReinforceCommand};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, format_confidence, format_timestamp, truncate_string};
