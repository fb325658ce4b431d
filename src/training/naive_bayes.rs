//! Incremental Gaussian Naive Bayes
//!
//! Per-class feature statistics are kept with a weighted single-pass
//! Welford update, so every training call costs O(n_features) and no
//! instance is ever stored.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::instance::Instance;
use super::models::OnlineClassifier;
use crate::error::{DriftBaggingError, Result};

/// Weighted running statistics of one class
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassStats {
    /// Total instance weight observed for the class
    weight: f64,
    /// Running mean per feature
    means: Vec<f64>,
    /// Weighted sum of squared deviations per feature
    m2: Vec<f64>,
}

impl ClassStats {
    fn new(n_features: usize) -> Self {
        Self {
            weight: 0.0,
            means: vec![0.0; n_features],
            m2: vec![0.0; n_features],
        }
    }

    fn update(&mut self, x: &[f64], w: f64) {
        let new_weight = self.weight + w;
        for (j, &val) in x.iter().enumerate() {
            let delta = val - self.means[j];
            self.means[j] += delta * w / new_weight;
            let delta2 = val - self.means[j];
            self.m2[j] += w * delta * delta2;
        }
        self.weight = new_weight;
    }

    fn log_likelihood(&self, x: &[f64], var_smoothing: f64) -> f64 {
        x.iter()
            .zip(self.means.iter())
            .zip(self.m2.iter())
            .map(|((&xi, &mean), &m2)| {
                let var = m2 / self.weight + var_smoothing;
                -0.5 * ((xi - mean).powi(2) / var + var.ln() + (2.0 * PI).ln())
            })
            .sum()
    }
}

/// Gaussian Naive Bayes trained one instance at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianNaiveBayes {
    /// Statistics indexed by class label
    classes: Vec<Option<ClassStats>>,
    /// Feature count fixed by the first training instance
    n_features: Option<usize>,
    /// Total observed weight across classes
    total_weight: f64,
    /// Smoothing added to every variance
    var_smoothing: f64,
}

impl Default for GaussianNaiveBayes {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianNaiveBayes {
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            n_features: None,
            total_weight: 0.0,
            var_smoothing: 1e-9,
        }
    }

    /// Set variance smoothing parameter
    pub fn with_var_smoothing(mut self, smoothing: f64) -> Self {
        self.var_smoothing = smoothing.max(0.0);
        self
    }

    /// Total training weight seen so far
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Observed weight for a class
    pub fn class_weight(&self, class: usize) -> f64 {
        self.classes
            .get(class)
            .and_then(|c| c.as_ref())
            .map_or(0.0, |c| c.weight)
    }

    fn check_dimensions(&self, instance: &Instance) -> Result<()> {
        match self.n_features {
            Some(n) if n != instance.n_features() => Err(DriftBaggingError::ModelError(format!(
                "gaussian naive bayes expects {} features, got {}",
                n,
                instance.n_features()
            ))),
            _ => Ok(()),
        }
    }
}

impl OnlineClassifier for GaussianNaiveBayes {
    fn train_on_instance(&mut self, instance: &Instance) -> Result<()> {
        let Some(label) = instance.label else {
            return Ok(());
        };
        if instance.weight <= 0.0 {
            return Ok(());
        }
        self.check_dimensions(instance)?;

        let n_features = *self.n_features.get_or_insert(instance.n_features());
        if self.classes.len() <= label {
            self.classes.resize(label + 1, None);
        }
        let x = instance.features.to_vec();
        self.classes[label]
            .get_or_insert_with(|| ClassStats::new(n_features))
            .update(&x, instance.weight);
        self.total_weight += instance.weight;
        Ok(())
    }

    fn votes_for_instance(&self, instance: &Instance) -> Result<Vec<f64>> {
        if self.total_weight <= 0.0 {
            return Ok(Vec::new());
        }
        self.check_dimensions(instance)?;

        let x = instance.features.to_vec();
        let log_probs: Vec<Option<f64>> = self
            .classes
            .iter()
            .map(|stats| {
                stats.as_ref().map(|s| {
                    (s.weight / self.total_weight).ln() + s.log_likelihood(&x, self.var_smoothing)
                })
            })
            .collect();

        // Normalize (log-sum-exp trick)
        let max_val = log_probs
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let log_sum = log_probs
            .iter()
            .flatten()
            .map(|&v| (v - max_val).exp())
            .sum::<f64>()
            .ln();

        Ok(log_probs
            .into_iter()
            .map(|lp| lp.map_or(0.0, |v| (v - max_val - log_sum).exp()))
            .collect())
    }

    fn reset(&mut self) {
        self.classes.clear();
        self.n_features = None;
        self.total_weight = 0.0;
    }

    fn name(&self) -> &'static str {
        "gaussian_naive_bayes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::max_index;
    use ndarray::array;

    fn trained() -> GaussianNaiveBayes {
        let mut nb = GaussianNaiveBayes::new();
        for i in 0..20 {
            let jitter = (i % 5) as f64 * 0.1;
            nb.train_on_instance(&Instance::new(array![1.0 + jitter, 1.0 - jitter], 0))
                .unwrap();
            nb.train_on_instance(&Instance::new(array![5.0 + jitter, 5.0 - jitter], 2))
                .unwrap();
        }
        nb
    }

    #[test]
    fn test_abstains_before_training() {
        let nb = GaussianNaiveBayes::new();
        let votes = nb.votes_for_instance(&Instance::new(array![1.0], 0)).unwrap();
        assert!(votes.is_empty());
    }

    #[test]
    fn test_separates_classes() {
        let nb = trained();
        let votes = nb.votes_for_instance(&Instance::unlabeled(array![1.1, 0.9])).unwrap();

        assert_eq!(votes.len(), 3);
        assert_eq!(votes[1], 0.0); // never observed
        assert_eq!(max_index(&votes), Some(0));
        assert!((votes.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let votes = nb.votes_for_instance(&Instance::unlabeled(array![5.2, 4.8])).unwrap();
        assert_eq!(max_index(&votes), Some(2));
    }

    #[test]
    fn test_heavy_smoothing_falls_back_to_priors() {
        let mut nb = GaussianNaiveBayes::new().with_var_smoothing(1e6);
        for i in 0..20 {
            let jitter = (i % 5) as f64 * 0.1;
            nb.train_on_instance(&Instance::new(array![1.0 + jitter, 1.0 - jitter], 0))
                .unwrap();
            nb.train_on_instance(&Instance::new(array![5.0 + jitter, 5.0 - jitter], 2))
                .unwrap();
        }

        let votes = nb.votes_for_instance(&Instance::unlabeled(array![1.1, 0.9])).unwrap();
        assert!((votes[0] - 0.5).abs() < 1e-3);
        assert!((votes[2] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_weight_scales_prior() {
        let mut nb = GaussianNaiveBayes::new();
        nb.train_on_instance(&Instance::new(array![0.0], 0).with_weight(3.0)).unwrap();
        nb.train_on_instance(&Instance::new(array![0.0], 1)).unwrap();

        assert_eq!(nb.class_weight(0), 3.0);
        assert_eq!(nb.total_weight(), 4.0);

        let votes = nb.votes_for_instance(&Instance::unlabeled(array![0.0])).unwrap();
        assert!((votes[0] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_matches_repetition() {
        let mut weighted = GaussianNaiveBayes::new();
        weighted.train_on_instance(&Instance::new(array![2.0], 0).with_weight(2.0)).unwrap();
        weighted.train_on_instance(&Instance::new(array![5.0], 0)).unwrap();

        let mut repeated = GaussianNaiveBayes::new();
        for x in [2.0, 2.0, 5.0] {
            repeated.train_on_instance(&Instance::new(array![x], 0)).unwrap();
        }

        let a = weighted.classes[0].as_ref().unwrap();
        let b = repeated.classes[0].as_ref().unwrap();
        assert!((a.means[0] - b.means[0]).abs() < 1e-12);
        assert!((a.m2[0] - b.m2[0]).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch_is_model_error() {
        let mut nb = trained();
        let err = nb
            .train_on_instance(&Instance::new(array![1.0, 2.0, 3.0], 0))
            .unwrap_err();
        assert!(matches!(err, DriftBaggingError::ModelError(_)));
    }

    #[test]
    fn test_reset() {
        let mut nb = trained();
        nb.reset();
        assert_eq!(nb.total_weight(), 0.0);
        assert!(nb
            .votes_for_instance(&Instance::unlabeled(array![1.0, 1.0]))
            .unwrap()
            .is_empty());
    }
}
