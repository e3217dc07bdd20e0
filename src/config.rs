//! Session configuration, loadable from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScopeResult;
use crate::exercise::{Difficulty, MetricSelection};
use crate::validator::DEFAULT_TOLERANCE_PERCENT;

/// Settings for a training session. Every field is optional in JSON and falls back to its default.
///
/// ```json
/// {
///     "tolerance_percent": 10,
///     "shape_randomization": true,
///     "metrics": { "chosen": ["period", "frequency"] },
///     "difficulty": "medium",
///     "seed": 42
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Accepted relative error of an answer, in percent, clamped to 1-20.
    pub tolerance_percent: f64,
    /// Draw square and triangle waves as well as sines.
    pub shape_randomization: bool,
    pub metrics: MetricSelection,
    /// Difficulty of the first exercise.
    pub difficulty: Difficulty,
    /// Seed for reproducible exercises; entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tolerance_percent: DEFAULT_TOLERANCE_PERCENT,
            shape_randomization: false,
            metrics: MetricSelection::Tiered,
            difficulty: Difficulty::Easy,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> ScopeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ScopeResult<Self> {
        let path = path.as_ref();
        log::info!("Loading configuration from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
