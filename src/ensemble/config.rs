//! Ensemble configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::voting::VoteCombination;
use crate::error::{DriftBaggingError, Result};

/// Configuration for [`ReplacementBagging`](super::ReplacementBagging)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Number of voting members
    pub ensemble_size: usize,
    /// Prediction queries between replacement evaluations
    pub window_size: usize,
    /// Mean of the Poisson replication count
    pub poisson_lambda: f64,
    /// Seed for the resampling stream
    pub seed: u64,
    /// How member votes are combined
    pub combination: VoteCombination,
    /// Train members on the rayon pool
    pub parallel_training: bool,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            ensemble_size: 10,
            window_size: 1000,
            poisson_lambda: 1.0,
            seed: 1,
            combination: VoteCombination::Cumulative,
            parallel_training: false,
        }
    }
}

impl EnsembleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of members
    pub fn with_ensemble_size(mut self, size: usize) -> Self {
        self.ensemble_size = size;
        self
    }

    /// Set the replacement window
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Set the Poisson mean
    pub fn with_poisson_lambda(mut self, lambda: f64) -> Self {
        self.poisson_lambda = lambda;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the vote combination rule
    pub fn with_combination(mut self, combination: VoteCombination) -> Self {
        self.combination = combination;
        self
    }

    /// Enable or disable parallel member training
    pub fn with_parallel_training(mut self, parallel: bool) -> Self {
        self.parallel_training = parallel;
        self
    }

    /// Check every field, failing on the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.ensemble_size < 1 {
            return Err(DriftBaggingError::ConfigError(format!(
                "ensemble_size must be at least 1, got {}",
                self.ensemble_size
            )));
        }
        if self.window_size < 1 {
            return Err(DriftBaggingError::ConfigError(format!(
                "window_size must be at least 1, got {}",
                self.window_size
            )));
        }
        if !self.poisson_lambda.is_finite() || self.poisson_lambda <= 0.0 {
            return Err(DriftBaggingError::InvalidParameter {
                name: "poisson_lambda".to_string(),
                value: self.poisson_lambda.to_string(),
                reason: "must be finite and positive".to_string(),
            });
        }
        Ok(())
    }

    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }
}
