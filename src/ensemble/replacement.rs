//! Windowed replace-the-worst policy
//!
//! Every `window_size` prediction queries the weakest member is compared
//! with the candidate. The candidate takes the slot only when its accuracy
//! is strictly higher; either way a blank candidate is installed and the
//! window restarts.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::member::EnsembleMember;
use crate::training::OnlineClassifier;

/// Outcome of one window evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplacementDecision {
    /// Slot with the lowest accuracy
    pub worst_index: usize,
    pub worst_accuracy: f64,
    pub candidate_accuracy: f64,
    /// Whether the candidate took over the slot
    pub replaced: bool,
}

/// Window counter and swap logic
#[derive(Debug, Clone)]
pub struct ReplacementPolicy {
    window_size: usize,
    window_counter: usize,
    evaluations: u64,
    replacements: u64,
    last_decision: Option<ReplacementDecision>,
}

impl ReplacementPolicy {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
            window_counter: 0,
            evaluations: 0,
            replacements: 0,
            last_decision: None,
        }
    }

    /// Count one prediction query; true when it completes a window
    pub fn tick(&mut self) -> bool {
        self.window_counter += 1;
        self.window_counter % self.window_size == 0
    }

    /// Whether the next [`tick`](Self::tick) completes a window
    pub fn window_completes(&self) -> bool {
        (self.window_counter + 1) % self.window_size == 0
    }

    /// Index and accuracy of the weakest member, first index on ties
    pub fn find_worst<M: OnlineClassifier>(members: &[EnsembleMember<M>]) -> Option<(usize, f64)> {
        let mut worst: Option<(usize, f64)> = None;
        for (i, member) in members.iter().enumerate() {
            let acc = member.accuracy();
            match worst {
                Some((_, w)) if w <= acc => {}
                _ => worst = Some((i, acc)),
            }
        }
        worst
    }

    /// Decision an evaluation would take right now, without applying it
    pub fn decide<M: OnlineClassifier>(
        members: &[EnsembleMember<M>],
        candidate: &EnsembleMember<M>,
    ) -> Option<ReplacementDecision> {
        Self::find_worst(members).map(|(worst_index, worst_accuracy)| {
            let candidate_accuracy = candidate.accuracy();
            ReplacementDecision {
                worst_index,
                worst_accuracy,
                candidate_accuracy,
                replaced: candidate_accuracy > worst_accuracy,
            }
        })
    }

    /// Run one evaluation and install `fresh_candidate` as the new challenger
    pub fn evaluate<M: OnlineClassifier>(
        &mut self,
        members: &mut [EnsembleMember<M>],
        candidate: &mut EnsembleMember<M>,
        fresh_candidate: M,
    ) -> Option<ReplacementDecision> {
        let decision = Self::decide(members, candidate);

        let retired = std::mem::replace(candidate, EnsembleMember::new(fresh_candidate));
        match decision {
            Some(d) if d.replaced => {
                members[d.worst_index] = retired;
                self.replacements += 1;
                info!(
                    slot = d.worst_index,
                    worst_accuracy = d.worst_accuracy,
                    candidate_accuracy = d.candidate_accuracy,
                    "Candidate replaced ensemble member"
                );
            }
            Some(d) => {
                debug!(
                    slot = d.worst_index,
                    worst_accuracy = d.worst_accuracy,
                    candidate_accuracy = d.candidate_accuracy,
                    "Candidate discarded"
                );
            }
            None => {}
        }

        self.evaluations += 1;
        self.last_decision = decision;
        self.window_counter = 0;
        decision
    }

    /// Back to an empty window with no history
    pub fn reset(&mut self) {
        *self = Self::new(self.window_size);
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn window_counter(&self) -> usize {
        self.window_counter
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    pub fn last_decision(&self) -> Option<ReplacementDecision> {
        self.last_decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{Instance, MajorityClass};
    use ndarray::array;

    fn member_with(correct: usize, total: usize, label: usize) -> EnsembleMember<MajorityClass> {
        let mut m = EnsembleMember::new(MajorityClass::new());
        m.train_replicated(&Instance::new(array![0.0], label), 1).unwrap();
        for i in 0..total {
            m.performance_mut().record(i < correct);
        }
        m
    }

    #[test]
    fn test_tick_fires_once_per_window() {
        let mut policy = ReplacementPolicy::new(3);
        assert!(!policy.window_completes());
        assert!(!policy.tick());
        assert!(!policy.tick());
        assert!(policy.window_completes());
        assert!(policy.tick());
        assert_eq!(policy.window_counter(), 3);
    }

    #[test]
    fn test_find_worst_first_on_ties() {
        let members = vec![member_with(3, 4, 0), member_with(1, 4, 0), member_with(1, 4, 0)];
        assert_eq!(ReplacementPolicy::find_worst(&members), Some((1, 0.25)));
    }

    #[test]
    fn test_cold_members_count_as_zero() {
        let members = vec![member_with(2, 2, 0), member_with(0, 0, 0)];
        assert_eq!(ReplacementPolicy::find_worst(&members), Some((1, 0.0)));
    }

    #[test]
    fn test_better_candidate_takes_slot() {
        let mut policy = ReplacementPolicy::new(5);
        let mut members = vec![member_with(4, 5, 0), member_with(1, 5, 0)];
        let mut candidate = member_with(3, 5, 1);

        let decision = policy
            .evaluate(&mut members, &mut candidate, MajorityClass::new())
            .unwrap();

        assert!(decision.replaced);
        assert_eq!(decision.worst_index, 1);
        assert_eq!(members[1].model().class_weights(), &[0.0, 1.0]);
        assert_eq!(members[1].performance().correct(), 3.0);
        assert_eq!(candidate.performance().total(), 0.0);
        assert!(candidate.model().class_weights().is_empty());
        assert_eq!(policy.replacements(), 1);
        assert_eq!(policy.window_counter(), 0);
    }

    #[test]
    fn test_equal_candidate_is_discarded() {
        let mut policy = ReplacementPolicy::new(5);
        let mut members = vec![member_with(2, 5, 0)];
        let mut candidate = member_with(2, 5, 1);

        let decision = policy
            .evaluate(&mut members, &mut candidate, MajorityClass::new())
            .unwrap();

        assert!(!decision.replaced);
        assert_eq!(members[0].model().class_weights(), &[1.0]);
        assert_eq!(candidate.performance().total(), 0.0);
        assert_eq!(policy.evaluations(), 1);
        assert_eq!(policy.replacements(), 0);
    }
}
