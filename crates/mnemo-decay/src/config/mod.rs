use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DecayError, Result};
use crate::memory::classifier::Thresholds;
use crate::memory::policy::{DecayPolicy, PolicyTable};
use crate::memory::types::MemoryCategory;

/// Main configuration structure for the decay engine
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Per-category overrides of the default decay policy, keyed by
    /// category name
    #[serde(default)]
    pub policy: BTreeMap<String, CategoryPolicyConfig>,
    /// Tier thresholds for classification
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

/// Decay policy overrides for one category. Unset fields keep the
/// built-in default.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CategoryPolicyConfig {
    /// Decay constant per hour
    #[serde(default)]
    pub decay_rate: Option<f64>,
    /// Confidence at creation or full reset (0.0-1.0)
    #[serde(default)]
    pub initial_confidence: Option<f64>,
}

/// Classification thresholds (lower bounds of each tier)
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    /// Minimum confidence for direct use
    #[serde(default = "default_direct_threshold")]
    pub direct: f64,
    /// Minimum confidence for caveated use
    #[serde(default = "default_caveated_threshold")]
    pub caveated: f64,
    /// Minimum confidence before a memory becomes an archive candidate
    #[serde(default = "default_verify_threshold")]
    pub verify: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            direct: default_direct_threshold(),
            caveated: default_caveated_threshold(),
            verify: default_verify_threshold(),
        }
    }
}

fn default_direct_threshold() -> f64 {
    0.7
}

fn default_caveated_threshold() -> f64 {
    0.5
}

fn default_verify_threshold() -> f64 {
    0.3
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| DecayError::Serialization(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from an explicit path, or from the first default
    /// location that exists, or fall back to built-in defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_file(path);
        }

        for path in default_config_paths() {
            if path.exists() {
                return Self::load_file(&path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            DecayError::InvalidConfig(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Build the validated policy table described by this config
    pub fn policy_table(&self) -> Result<PolicyTable> {
        let mut table = PolicyTable::default();
        for (name, overrides) in &self.policy {
            let category: MemoryCategory = name.parse()?;
            let current = table.policy(category);
            let policy = DecayPolicy::new(
                overrides.decay_rate.unwrap_or(current.decay_rate),
                overrides
                    .initial_confidence
                    .unwrap_or(current.initial_confidence),
            );
            table = table.with_policy(category, policy);
        }
        table.validate()?;
        Ok(table)
    }

    /// Build the validated thresholds described by this config
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(
            self.thresholds.direct,
            self.thresholds.caveated,
            self.thresholds.verify,
        )
    }
}

/// Locations searched when no config path is given, in order
pub fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|h| h.join(".mnemo").join("decay.toml")),
        dirs::config_dir().map(|c| c.join("mnemo").join("decay.toml")),
        Some(PathBuf::from("decay.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}
