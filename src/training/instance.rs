//! Weighted streaming instance

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A single example flowing through the stream.
///
/// `label` is `None` for queries where ground truth is not available.
/// `weight` scales the example's influence on incremental learners and is
/// multiplied by the Poisson replication count during online bagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Feature values
    pub features: Array1<f64>,
    /// Class index of the true label
    pub label: Option<usize>,
    /// Instance weight
    pub weight: f64,
}

impl Instance {
    /// Create a labelled instance with unit weight
    pub fn new(features: Array1<f64>, label: usize) -> Self {
        Self {
            features,
            label: Some(label),
            weight: 1.0,
        }
    }

    /// Create an instance without ground truth
    pub fn unlabeled(features: Array1<f64>) -> Self {
        Self {
            features,
            label: None,
            weight: 1.0,
        }
    }

    /// Copy of this instance carrying a different weight
    pub fn with_weight(&self, weight: f64) -> Self {
        Self {
            features: self.features.clone(),
            label: self.label,
            weight,
        }
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}
