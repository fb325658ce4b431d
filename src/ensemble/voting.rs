//! Accuracy-weighted vote aggregation

use serde::{Deserialize, Serialize};

use crate::utils::{max_index, total_mass};

/// How successive member votes are folded into the combined vector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoteCombination {
    /// Every voter adds its accuracy at its top class plus its raw vote
    #[default]
    Cumulative,
    /// Each voter first zeroes the combined entries its vote covers, then
    /// writes its accuracy at its top class and adds its raw vote
    LastVoter,
}

/// Combines member votes, boosting each member's top class by its accuracy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AccuracyWeightedVote {
    combination: VoteCombination,
}

impl AccuracyWeightedVote {
    pub fn new(combination: VoteCombination) -> Self {
        Self { combination }
    }

    pub fn combination(&self) -> VoteCombination {
        self.combination
    }

    /// Fold one member's vote into `combined`.
    ///
    /// Returns the member's top class, or `None` when the vote has no mass
    /// and the member abstains (nothing is added).
    pub fn add_vote(&self, combined: &mut Vec<f64>, vote: &[f64], accuracy: f64) -> Option<usize> {
        if total_mass(vote) <= 0.0 {
            return None;
        }
        let top = max_index(vote)?;

        if combined.len() < vote.len() {
            combined.resize(vote.len(), 0.0);
        }

        match self.combination {
            VoteCombination::Cumulative => {
                combined[top] += accuracy;
            }
            VoteCombination::LastVoter => {
                combined[..vote.len()].iter_mut().for_each(|v| *v = 0.0);
                combined[top] = accuracy;
            }
        }
        for (c, &v) in combined.iter_mut().zip(vote.iter()) {
            *c += v;
        }
        Some(top)
    }

    /// Combine pre-computed `(vote, accuracy)` pairs in member order
    pub fn combine(&self, votes: &[(Vec<f64>, f64)]) -> Vec<f64> {
        let mut combined = Vec::new();
        for (vote, accuracy) in votes {
            self.add_vote(&mut combined, vote, *accuracy);
        }
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_voting() {
        let voter = AccuracyWeightedVote::new(VoteCombination::Cumulative);

        let votes = vec![
            (vec![0.7, 0.3], 0.5),
            (vec![0.2, 0.8], 1.0),
            (vec![0.6, 0.4, 0.0], 0.25),
        ];

        let result = voter.combine(&votes);

        assert_eq!(result.len(), 3);
        assert!((result[0] - (0.7 + 0.5 + 0.2 + 0.6 + 0.25)).abs() < 1e-12);
        assert!((result[1] - (0.3 + 0.8 + 1.0 + 0.4)).abs() < 1e-12);
        assert_eq!(result[2], 0.0);
    }

    #[test]
    fn test_abstaining_member_contributes_nothing() {
        let voter = AccuracyWeightedVote::default();
        let mut combined = vec![1.0, 2.0];

        assert_eq!(voter.add_vote(&mut combined, &[0.0, 0.0], 0.9), None);
        assert_eq!(voter.add_vote(&mut combined, &[], 0.9), None);
        assert_eq!(combined, vec![1.0, 2.0]);
    }

    #[test]
    fn test_last_voter_resets_covered_entries() {
        let voter = AccuracyWeightedVote::new(VoteCombination::LastVoter);

        let votes = vec![
            (vec![0.1, 0.2, 0.7], 0.9),
            (vec![0.6, 0.4], 0.5),
        ];

        let result = voter.combine(&votes);

        // first voter's class 2 survives, classes 0..2 were overwritten
        assert!((result[0] - 1.1).abs() < 1e-12);
        assert!((result[1] - 0.4).abs() < 1e-12);
        assert!((result[2] - (0.9 + 0.7)).abs() < 1e-12);
    }

    #[test]
    fn test_top_class_tie_goes_to_lowest_index() {
        let voter = AccuracyWeightedVote::default();
        let mut combined = Vec::new();

        let top = voter.add_vote(&mut combined, &[0.5, 0.5], 1.0);

        assert_eq!(top, Some(0));
        assert_eq!(combined, vec![1.5, 0.5]);
    }

    #[test]
    fn test_zero_accuracy_still_adds_raw_vote() {
        let voter = AccuracyWeightedVote::default();
        let result = voter.combine(&[(vec![0.0, 3.0], 0.0)]);
        assert_eq!(result, vec![0.0, 3.0]);
    }
}
