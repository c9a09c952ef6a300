//! Configuration for the SOM posterization engine.

use crate::error::{Result, SomError};
use crate::som::TrainerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the posterizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SOM (Self-Organizing Map) configuration.
    pub som: SomConfig,

    /// Output file configuration.
    pub output: OutputConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.som.validate()?;
        Ok(config)
    }
}

/// Self-Organizing Map configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SomConfig {
    /// Posterization level: the map is `level x level` neurons.
    /// Default: 2 (4 colors).
    pub level: usize,

    /// Maximum number of training epochs.
    /// Default: 3000.
    pub max_epochs: usize,

    /// Convergence threshold on the aggregate per-epoch weight change.
    /// Default: 0.001.
    pub threshold: f32,

    /// Random seed for reproducibility.
    /// Default: None (random).
    pub seed: Option<u64>,

    /// Clamp neuron weights into [0, 1] after every update.
    /// Default: false.
    pub clamp_weights: bool,

    /// Remap pixels across all cores after training.
    /// Default: true.
    pub parallel: bool,
}

impl Default for SomConfig {
    fn default() -> Self {
        Self {
            level: 2,
            max_epochs: 3000,
            threshold: 0.001,
            seed: None,
            clamp_weights: false,
            parallel: true,
        }
    }
}

impl SomConfig {
    /// Returns the total number of neurons in the SOM.
    #[inline]
    pub fn neurons(&self) -> usize {
        self.level * self.level
    }

    /// Checks the values a training run cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.level == 0 {
            return Err(SomError::Config("level must be at least 1".to_string()));
        }
        if self.max_epochs == 0 {
            return Err(SomError::Config("max_epochs must be at least 1".to_string()));
        }
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(SomError::Config(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Builds the trainer settings for this configuration.
    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            max_epochs: self.max_epochs,
            threshold: self.threshold,
            clamp_weights: self.clamp_weights,
        }
    }
}

/// Output file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the input file stem when no output path is given.
    /// Default: "_posterized".
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "_posterized".to_string(),
        }
    }
}
