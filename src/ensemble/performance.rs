//! Running accuracy counters

use serde::{Deserialize, Serialize};

/// Correct/total prediction counts of one ensemble slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTracker {
    correct: f64,
    total: f64,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluated prediction
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1.0;
        }
        self.total += 1.0;
    }

    /// `correct / total`, or 0.0 before the first recorded prediction
    pub fn accuracy(&self) -> f64 {
        if self.total > 0.0 {
            self.correct / self.total
        } else {
            0.0
        }
    }

    pub fn correct(&self) -> f64 {
        self.correct
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
