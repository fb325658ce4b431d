//! Ensemble slot: a model plus its running accuracy

use super::performance::PerformanceTracker;
use crate::error::Result;
use crate::training::{Instance, OnlineClassifier};

/// One model slot of the ensemble, also used for the candidate
#[derive(Debug, Clone)]
pub struct EnsembleMember<M> {
    model: M,
    performance: PerformanceTracker,
}

impl<M: OnlineClassifier> EnsembleMember<M> {
    /// Wrap a model with empty performance counters
    pub fn new(model: M) -> Self {
        Self {
            model,
            performance: PerformanceTracker::new(),
        }
    }

    /// Train on `instance` replicated `k` times; `k == 0` is a no-op
    pub fn train_replicated(&mut self, instance: &Instance, k: u32) -> Result<()> {
        if k == 0 {
            return Ok(());
        }
        let weighted = instance.with_weight(instance.weight * k as f64);
        self.model.train_on_instance(&weighted)
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn performance(&self) -> &PerformanceTracker {
        &self.performance
    }

    pub(crate) fn performance_mut(&mut self) -> &mut PerformanceTracker {
        &mut self.performance
    }

    /// Running accuracy, 0.0 before any recorded prediction
    pub fn accuracy(&self) -> f64 {
        self.performance.accuracy()
    }
}
