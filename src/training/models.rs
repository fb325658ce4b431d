//! Base learner capability trait

use super::instance::Instance;
use crate::error::Result;
use crate::utils::{max_index, total_mass};

/// An incremental classifier that can be plugged into an ensemble slot.
///
/// Implementations are opaque to the ensemble: it only trains them, asks for
/// their votes, resets them and clones them. `Clone` must produce an
/// independent model whose later training does not affect the original.
pub trait OnlineClassifier: Clone + Send + Sync {
    /// Update the model with one (possibly weighted) instance
    fn train_on_instance(&mut self, instance: &Instance) -> Result<()>;

    /// Per-class scores for an instance.
    ///
    /// Index `i` holds the score of class `i`. An empty vector or a vector
    /// summing to zero means the model has no opinion yet.
    fn votes_for_instance(&self, instance: &Instance) -> Result<Vec<f64>>;

    /// Forget everything learned so far
    fn reset(&mut self);

    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// Whether the top-scoring class matches the instance label.
    ///
    /// Unlabelled instances and abstaining models never count as correct.
    /// An empty or zero-mass vote is not read as a vote for class 0, so an
    /// abstaining model is wrong even when the label is 0.
    fn correctly_classifies(&self, instance: &Instance) -> Result<bool> {
        let Some(label) = instance.label else {
            return Ok(false);
        };
        let votes = self.votes_for_instance(instance)?;
        if total_mass(&votes) <= 0.0 {
            return Ok(false);
        }
        Ok(max_index(&votes) == Some(label))
    }

    /// Fresh, untrained copy of this model
    fn blank_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }
}
