use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Decay(#[from] mnemo_decay::DecayError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to {action} {}: {source}", path.display())]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two entries in one record file share an id
    #[error("Duplicate memory id {id} in {}", path.display())]
    DuplicateId { id: Uuid, path: PathBuf },

    #[error("{0}")]
    Invalid(String),
}

impl From<String> for CliError {
    fn from(s: String) -> Self {
        CliError::Invalid(s)
    }
}

pub type CliResult<T> = Result<T, CliError>;
