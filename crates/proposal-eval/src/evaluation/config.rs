use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::error;

/// Per-section weights. Applied as a weighted sum; callers normalize if they
/// want the final score on a 0-100 scale. Keys missing from a weights file
/// count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub technical_merit: f64,
    #[serde(default)]
    pub past_performance: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            cost: 0.3,
            technical_merit: 0.4,
            past_performance: 0.3,
        }
    }
}

impl WeightConfig {
    /// Reads weights from a JSON file, falling back to the defaults on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(weights) => weights,
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to load weights config");
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, WeightConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let weights: WeightConfig = serde_json::from_str(&raw)?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), WeightConfigError> {
        for (field, value) in [
            ("cost", self.cost),
            ("technical_merit", self.technical_merit),
            ("past_performance", self.past_performance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }

    pub fn weighted_sum(&self, cost: f64, technical_merit: f64, past_performance: f64) -> f64 {
        cost * self.cost
            + technical_merit * self.technical_merit
            + past_performance * self.past_performance
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeightConfigError {
    #[error("unable to read weights file: {0}")]
    Io(#[from] std::io::Error),
    #[error("weights file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weight '{field}' must be a non-negative number (got {value})")]
    Invalid { field: &'static str, value: f64 },
}
