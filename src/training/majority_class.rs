//! Majority-class baseline

use serde::{Deserialize, Serialize};

use super::instance::Instance;
use super::models::OnlineClassifier;
use crate::error::Result;

/// Votes with the weighted class frequencies observed so far
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MajorityClass {
    class_weights: Vec<f64>,
}

impl MajorityClass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weighted class counts seen so far
    pub fn class_weights(&self) -> &[f64] {
        &self.class_weights
    }
}

impl OnlineClassifier for MajorityClass {
    fn train_on_instance(&mut self, instance: &Instance) -> Result<()> {
        if let Some(label) = instance.label {
            if self.class_weights.len() <= label {
                self.class_weights.resize(label + 1, 0.0);
            }
            self.class_weights[label] += instance.weight.max(0.0);
        }
        Ok(())
    }

    fn votes_for_instance(&self, _instance: &Instance) -> Result<Vec<f64>> {
        Ok(self.class_weights.clone())
    }

    fn reset(&mut self) {
        self.class_weights.clear();
    }

    fn name(&self) -> &'static str {
        "majority_class"
    }
}
