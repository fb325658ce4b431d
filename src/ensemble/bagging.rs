//! Online bagging with periodic worst-member replacement

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::EnsembleConfig;
use super::member::EnsembleMember;
use super::replacement::{ReplacementDecision, ReplacementPolicy};
use super::resampler::PoissonResampler;
use super::voting::AccuracyWeightedVote;
use crate::error::{DriftBaggingError, Result};
use crate::training::{Instance, OnlineClassifier};
use crate::utils::max_index;

/// Snapshot of the ensemble's bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleMeasurements {
    pub ensemble_size: usize,
    pub window_size: usize,
    pub window_counter: usize,
    pub instances_trained: u64,
    pub evaluations: u64,
    pub replacements: u64,
    pub member_accuracies: Vec<f64>,
    pub candidate_accuracy: f64,
}

/// Online bagging ensemble that keeps a challenger in training and lets it
/// replace the weakest member once per window.
///
/// Each training instance is offered to every member and to the candidate
/// with an independent Poisson replication count. Each prediction query
/// ticks the window counter, runs the replacement policy when a window
/// completes, then combines member votes weighted by running accuracy. When
/// the query carries a label, member and candidate accuracies are updated
/// from it.
#[derive(Debug, Clone)]
pub struct ReplacementBagging<M: OnlineClassifier> {
    config: EnsembleConfig,
    template: M,
    members: Vec<EnsembleMember<M>>,
    candidate: EnsembleMember<M>,
    resampler: PoissonResampler,
    policy: ReplacementPolicy,
    voter: AccuracyWeightedVote,
    instances_trained: u64,
}

impl<M: OnlineClassifier> ReplacementBagging<M> {
    /// Build an ensemble of blank copies of `template`
    pub fn new(config: EnsembleConfig, template: M) -> Result<Self> {
        config.validate()?;

        let template = template.blank_copy();
        let members = (0..config.ensemble_size)
            .map(|_| EnsembleMember::new(template.blank_copy()))
            .collect();
        let candidate = EnsembleMember::new(template.blank_copy());
        let resampler = PoissonResampler::new(config.poisson_lambda, config.seed)?;

        debug!(
            base_learner = template.name(),
            ensemble_size = config.ensemble_size,
            window_size = config.window_size,
            seed = config.seed,
            "Initialized replacement bagging ensemble"
        );

        Ok(Self {
            policy: ReplacementPolicy::new(config.window_size),
            voter: AccuracyWeightedVote::new(config.combination),
            config,
            template,
            members,
            candidate,
            resampler,
            instances_trained: 0,
        })
    }

    pub fn builder() -> ReplacementBaggingBuilder<M> {
        ReplacementBaggingBuilder::new()
    }

    /// Train every member and the candidate on one instance
    pub fn train(&mut self, instance: &Instance) -> Result<()> {
        // Draw all counts up front so parallel and sequential runs consume
        // the random stream identically.
        let draws = self.resampler.draw_many(self.members.len());
        let candidate_draw = self.resampler.draw();

        if self.config.parallel_training {
            self.members
                .par_iter_mut()
                .zip(draws.par_iter())
                .try_for_each(|(member, &k)| member.train_replicated(instance, k))?;
        } else {
            for (member, &k) in self.members.iter_mut().zip(draws.iter()) {
                member.train_replicated(instance, k)?;
            }
        }
        self.candidate.train_replicated(instance, candidate_draw)?;

        self.instances_trained += 1;
        Ok(())
    }

    /// Combined class scores for an instance.
    ///
    /// Completing a window triggers the replacement policy before the vote,
    /// so a freshly promoted member already votes on this query.
    ///
    /// Every model is queried before any state changes: if one fails, the
    /// error is returned and the window, slots and counters are untouched.
    pub fn predict(&mut self, instance: &Instance) -> Result<Vec<f64>> {
        let fresh = self
            .policy
            .window_completes()
            .then(|| self.template.blank_copy());
        let promoted = fresh
            .as_ref()
            .and_then(|_| ReplacementPolicy::decide(&self.members, &self.candidate))
            .filter(|d| d.replaced)
            .map(|d| d.worst_index);

        let votes = self
            .members
            .iter()
            .enumerate()
            .map(|(i, member)| {
                let voter = if promoted == Some(i) { &self.candidate } else { member };
                voter.model().votes_for_instance(instance)
            })
            .collect::<Result<Vec<_>>>()?;

        let candidate_correct = if instance.has_label() {
            let challenger = fresh.as_ref().unwrap_or(self.candidate.model());
            Some(challenger.correctly_classifies(instance)?)
        } else {
            None
        };

        self.policy.tick();
        if let Some(fresh) = fresh {
            self.policy
                .evaluate(&mut self.members, &mut self.candidate, fresh);
        }

        let mut combined = Vec::new();
        for (member, vote) in self.members.iter_mut().zip(votes.iter()) {
            let accuracy = member.accuracy();
            let top = self.voter.add_vote(&mut combined, vote, accuracy);
            if let (Some(top), Some(label)) = (top, instance.label) {
                member.performance_mut().record(top == label);
            }
        }

        if let Some(correct) = candidate_correct {
            self.candidate.performance_mut().record(correct);
        }

        Ok(combined)
    }

    /// Predicted class index, `None` when every member abstains
    pub fn predict_class(&mut self, instance: &Instance) -> Result<Option<usize>> {
        let votes = self.predict(instance)?;
        Ok(max_index(&votes))
    }

    /// Combined vote without touching counters or the window
    pub fn votes_without_tracking(&self, instance: &Instance) -> Result<Vec<f64>> {
        let mut combined = Vec::new();
        for member in &self.members {
            let vote = member.model().votes_for_instance(instance)?;
            self.voter.add_vote(&mut combined, &vote, member.accuracy());
        }
        Ok(combined)
    }

    /// Rebuild every slot from the template and restart the random stream
    pub fn reset(&mut self) {
        self.members = (0..self.config.ensemble_size)
            .map(|_| EnsembleMember::new(self.template.blank_copy()))
            .collect();
        self.candidate = EnsembleMember::new(self.template.blank_copy());
        self.resampler.reseed();
        self.policy.reset();
        self.instances_trained = 0;
    }

    pub fn members(&self) -> &[EnsembleMember<M>] {
        &self.members
    }

    pub fn candidate(&self) -> &EnsembleMember<M> {
        &self.candidate
    }

    /// The models currently voting
    pub fn sub_classifiers(&self) -> Vec<&M> {
        self.members.iter().map(|m| m.model()).collect()
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn ensemble_size(&self) -> usize {
        self.members.len()
    }

    pub fn window_size(&self) -> usize {
        self.policy.window_size()
    }

    pub fn window_counter(&self) -> usize {
        self.policy.window_counter()
    }

    pub fn evaluation_count(&self) -> u64 {
        self.policy.evaluations()
    }

    pub fn replacement_count(&self) -> u64 {
        self.policy.replacements()
    }

    pub fn last_replacement(&self) -> Option<ReplacementDecision> {
        self.policy.last_decision()
    }

    pub fn instances_trained(&self) -> u64 {
        self.instances_trained
    }

    pub fn measurements(&self) -> EnsembleMeasurements {
        EnsembleMeasurements {
            ensemble_size: self.ensemble_size(),
            window_size: self.window_size(),
            window_counter: self.window_counter(),
            instances_trained: self.instances_trained,
            evaluations: self.evaluation_count(),
            replacements: self.replacement_count(),
            member_accuracies: self.members.iter().map(|m| m.accuracy()).collect(),
            candidate_accuracy: self.candidate.accuracy(),
        }
    }
}

/// Builder for [`ReplacementBagging`]; the base learner is mandatory
#[derive(Debug, Clone)]
pub struct ReplacementBaggingBuilder<M> {
    config: EnsembleConfig,
    base_learner: Option<M>,
}

impl<M: OnlineClassifier> Default for ReplacementBaggingBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: OnlineClassifier> ReplacementBaggingBuilder<M> {
    pub fn new() -> Self {
        Self {
            config: EnsembleConfig::default(),
            base_learner: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: EnsembleConfig) -> Self {
        self.config = config;
        self
    }

    /// Template every slot is copied from
    pub fn base_learner(mut self, learner: M) -> Self {
        self.base_learner = Some(learner);
        self
    }

    pub fn ensemble_size(mut self, size: usize) -> Self {
        self.config.ensemble_size = size;
        self
    }

    pub fn window_size(mut self, size: usize) -> Self {
        self.config.window_size = size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> Result<ReplacementBagging<M>> {
        let template = self.base_learner.ok_or_else(|| {
            DriftBaggingError::ConfigError("base learner template is not set".to_string())
        })?;
        ReplacementBagging::new(self.config, template)
    }
}
