//! Behavior tiers for recalled memories
//!
//! Maps a confidence value to how the agent layer should treat the
//! memory: use it directly, caveat it, verify it with the user, or
//! consider it for archival. The classifier only labels; it never acts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecayError, Result};

/// Behavior tier for a memory at its current confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Confident enough to use as-is
    Direct,
    /// Usable, but phrased with a caveat
    Caveated,
    /// Should be confirmed with the user before use
    Verify,
    /// Below the lowest threshold; eligible for archival or deletion
    ArchiveCandidate,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Direct => "direct",
            Tier::Caveated => "caveated",
            Tier::Verify => "verify",
            Tier::ArchiveCandidate => "archive_candidate",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of the upper three tiers.
///
/// `[direct, 1]` is Direct, `[caveated, direct)` is Caveated,
/// `[verify, caveated)` is Verify and `[0, verify)` is ArchiveCandidate.
/// Valid thresholds satisfy `0 < verify < caveated < direct <= 1`, which
/// makes the four ranges partition [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub direct: f64,
    pub caveated: f64,
    pub verify: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            direct: 0.7,
            caveated: 0.5,
            verify: 0.3,
        }
    }
}

impl Thresholds {
    /// Build validated thresholds
    pub fn new(direct: f64, caveated: f64, verify: f64) -> Result<Self> {
        let thresholds = Self {
            direct,
            caveated,
            verify,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            direct,
            caveated,
            verify,
        } = *self;

        if ![direct, caveated, verify].iter().all(|t| t.is_finite()) {
            return Err(DecayError::InvalidConfig(
                "thresholds must be finite".to_string(),
            ));
        }
        if !(0.0 < verify && verify < caveated && caveated < direct && direct <= 1.0) {
            return Err(DecayError::InvalidConfig(format!(
                "thresholds must satisfy 0 < verify < caveated < direct <= 1, \
                 got verify={verify}, caveated={caveated}, direct={direct}"
            )));
        }
        Ok(())
    }

    /// Classify a confidence value.
    ///
    /// Total over all f64 inputs: values above 1 are Direct, values below 0
    /// and NaN are ArchiveCandidate.
    pub fn classify(&self, confidence: f64) -> Tier {
        if confidence >= self.direct {
            Tier::Direct
        } else if confidence >= self.caveated {
            Tier::Caveated
        } else if confidence >= self.verify {
            Tier::Verify
        } else {
            Tier::ArchiveCandidate
        }
    }
}

/// Classify with the default thresholds
pub fn classify(confidence: f64) -> Tier {
    Thresholds::default().classify(confidence)
}
