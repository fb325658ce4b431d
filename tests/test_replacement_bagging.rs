//! Integration test: replacement bagging behaviour over labelled streams

use drift_bagging::ensemble::{EnsembleConfig, PoissonResampler, ReplacementBagging};
use drift_bagging::prelude::*;
use drift_bagging::streaming::DriftSchedule;
use ndarray::array;

/// Always votes for one class, whatever it is trained on
#[derive(Debug, Clone)]
struct ConstantVote {
    class: usize,
}

impl OnlineClassifier for ConstantVote {
    fn train_on_instance(&mut self, _instance: &Instance) -> Result<()> {
        Ok(())
    }

    fn votes_for_instance(&self, _instance: &Instance) -> Result<Vec<f64>> {
        let mut votes = vec![0.0; self.class + 1];
        votes[self.class] = 1.0;
        Ok(votes)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "constant_vote"
    }
}

/// Locks onto the first label it is trained on; abstains until then
#[derive(Debug, Clone, Default)]
struct FirstLabel {
    locked: Option<usize>,
}

impl OnlineClassifier for FirstLabel {
    fn train_on_instance(&mut self, instance: &Instance) -> Result<()> {
        if self.locked.is_none() {
            self.locked = instance.label;
        }
        Ok(())
    }

    fn votes_for_instance(&self, _instance: &Instance) -> Result<Vec<f64>> {
        Ok(match self.locked {
            Some(class) => {
                let mut votes = vec![0.0; class + 1];
                votes[class] = 1.0;
                votes
            }
            None => Vec::new(),
        })
    }

    fn reset(&mut self) {
        self.locked = None;
    }

    fn name(&self) -> &'static str {
        "first_label"
    }
}

/// Never has an opinion
#[derive(Debug, Clone)]
struct Silent;

impl OnlineClassifier for Silent {
    fn train_on_instance(&mut self, _instance: &Instance) -> Result<()> {
        Ok(())
    }

    fn votes_for_instance(&self, _instance: &Instance) -> Result<Vec<f64>> {
        Ok(vec![0.0, 0.0])
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "silent"
    }
}

fn labelled(label: usize) -> Instance {
    Instance::new(array![label as f64], label)
}

fn config(size: usize, window: usize, seed: u64) -> EnsembleConfig {
    EnsembleConfig::new()
        .with_ensemble_size(size)
        .with_window_size(window)
        .with_seed(seed)
}

fn assert_counters_sane<M: OnlineClassifier>(ensemble: &ReplacementBagging<M>) {
    for member in ensemble.members().iter().chain(std::iter::once(ensemble.candidate())) {
        let perf = member.performance();
        assert!(perf.correct() >= 0.0);
        assert!(perf.correct() <= perf.total());
        assert!((0.0..=1.0).contains(&member.accuracy()));
    }
}

#[test]
fn test_window_scenario_with_constant_members() {
    let mut ensemble = ReplacementBagging::new(config(3, 5, 1), ConstantVote { class: 0 }).unwrap();

    for _ in 0..5 {
        let inst = labelled(0);
        ensemble.predict(&inst).unwrap();
        ensemble.train(&inst).unwrap();
    }

    // boundary reached on the fifth query, before its vote
    assert_eq!(ensemble.evaluation_count(), 1);
    assert_eq!(ensemble.window_counter(), 0);
    let decision = ensemble.last_replacement().unwrap();
    assert!(!decision.replaced);
    assert_eq!(decision.worst_index, 0);
    assert_eq!(decision.worst_accuracy, 1.0);
    assert_eq!(decision.candidate_accuracy, 1.0);

    for member in ensemble.members() {
        assert_eq!(member.performance().total(), 5.0);
        assert_eq!(member.performance().correct(), 5.0);
        assert_eq!(member.accuracy(), 1.0);
    }
    // fresh candidate only saw the boundary query
    assert_eq!(ensemble.candidate().performance().total(), 1.0);

    for _ in 0..5 {
        let inst = labelled(1);
        ensemble.predict(&inst).unwrap();
        ensemble.train(&inst).unwrap();
    }

    assert_eq!(ensemble.evaluation_count(), 2);
    let decision = ensemble.last_replacement().unwrap();
    assert!(!decision.replaced);
    assert!((decision.worst_accuracy - 5.0 / 9.0).abs() < 1e-12);
    assert!((decision.candidate_accuracy - 0.2).abs() < 1e-12);
    for member in ensemble.members() {
        assert_eq!(member.performance().total(), 10.0);
        assert_eq!(member.performance().correct(), 5.0);
    }
    assert_counters_sane(&ensemble);
}

#[test]
fn test_combined_vote_weights_by_accuracy() {
    let mut ensemble = ReplacementBagging::new(config(2, 100, 1), ConstantVote { class: 1 }).unwrap();

    // cold start: accuracy 0, only raw votes count
    let votes = ensemble.predict(&labelled(1)).unwrap();
    assert_eq!(votes, vec![0.0, 2.0]);

    // both members now 1/1
    let votes = ensemble.predict(&labelled(0)).unwrap();
    assert_eq!(votes, vec![0.0, 4.0]);

    // both members now 1/2
    let votes = ensemble.predict(&labelled(1)).unwrap();
    assert_eq!(votes, vec![0.0, 3.0]);
}

#[test]
fn test_candidate_replaces_degraded_member() {
    let mut ensemble = ReplacementBagging::new(config(3, 10, 5), FirstLabel::default()).unwrap();

    let stream: Vec<Instance> = std::iter::repeat(0)
        .take(15)
        .chain(std::iter::repeat(1).take(30))
        .map(labelled)
        .collect();

    let mut first_swap = None;
    for inst in &stream {
        let candidate_before = ensemble.candidate().model().locked;
        let candidate_perf = *ensemble.candidate().performance();
        let swaps = ensemble.replacement_count();

        ensemble.predict(inst).unwrap();

        if ensemble.replacement_count() > swaps && first_swap.is_none() {
            let decision = ensemble.last_replacement().unwrap();
            let slot = &ensemble.members()[decision.worst_index];
            assert!(decision.candidate_accuracy > decision.worst_accuracy);
            assert_eq!(slot.model().locked, candidate_before);
            // the promoted member keeps the candidate's counters plus this query
            assert_eq!(slot.performance().total(), candidate_perf.total() + 1.0);
            first_swap = Some(decision);
        }
        ensemble.train(inst).unwrap();
        assert_counters_sane(&ensemble);
    }

    assert!(first_swap.is_some());
    // only a promoted challenger can have locked onto the post-drift class
    assert!(ensemble
        .members()
        .iter()
        .any(|m| m.model().locked == Some(1)));
    assert_eq!(ensemble.evaluation_count(), 4);
    assert_eq!(ensemble.ensemble_size(), 3);
}

#[test]
fn test_silent_members_never_count() {
    let mut ensemble = ReplacementBagging::new(config(4, 3, 1), Silent).unwrap();

    for i in 0..10 {
        let inst = labelled(i % 2);
        let votes = ensemble.predict(&inst).unwrap();
        assert!(votes.is_empty());
        ensemble.train(&inst).unwrap();
    }

    for member in ensemble.members() {
        assert_eq!(member.performance().total(), 0.0);
        assert_eq!(member.accuracy(), 0.0);
    }
    assert_eq!(ensemble.evaluation_count(), 3);
    assert_counters_sane(&ensemble);
}

#[test]
fn test_training_weights_follow_poisson_draws() {
    let size = 4;
    let seed = 21;
    let n = 200;
    let mut ensemble = ReplacementBagging::new(config(size, 1000, seed), MajorityClass::new()).unwrap();
    for _ in 0..n {
        ensemble.train(&labelled(0)).unwrap();
    }

    let mut resampler = PoissonResampler::standard(seed).unwrap();
    let mut expected = vec![0.0; size + 1];
    for _ in 0..n {
        for slot in expected.iter_mut() {
            *slot += resampler.draw() as f64;
        }
    }

    for (member, &weight) in ensemble.members().iter().zip(expected.iter()) {
        let seen: f64 = member.model().class_weights().iter().sum();
        assert_eq!(seen, weight);
    }
    let candidate_seen: f64 = ensemble.candidate().model().class_weights().iter().sum();
    assert_eq!(candidate_seen, expected[size]);
}

#[test]
fn test_same_seed_same_run() {
    let schedule = DriftSchedule {
        drift_every: Some(500),
        noise: 0.05,
        seed: 4,
    };

    let run = || {
        let mut ensemble =
            ReplacementBagging::new(config(5, 100, 99), GaussianNaiveBayes::new()).unwrap();
        let mut votes = Vec::new();
        let mut decisions = Vec::new();
        for inst in SeaGenerator::new(schedule).unwrap().take(2000) {
            votes.push(ensemble.predict(&inst).unwrap());
            if ensemble.window_counter() == 0 {
                decisions.push(ensemble.last_replacement());
            }
            ensemble.train(&inst).unwrap();
        }
        (votes, decisions)
    };

    let (votes_a, decisions_a) = run();
    let (votes_b, decisions_b) = run();
    assert_eq!(votes_a, votes_b);
    assert_eq!(decisions_a, decisions_b);
    assert_eq!(decisions_a.len(), 20);
}

#[test]
fn test_follows_sea_drift() {
    let schedule = DriftSchedule {
        drift_every: Some(5000),
        noise: 0.0,
        seed: 12,
    };
    let mut ensemble = ReplacementBagging::new(config(10, 500, 3), GaussianNaiveBayes::new()).unwrap();

    let report = PrequentialEvaluator::new()
        .with_window(500)
        .with_report_every(500)
        .evaluate(&mut ensemble, SeaGenerator::new(schedule).unwrap().take(20_000))
        .unwrap();

    assert_eq!(report.instances, 20_000);
    assert!(report.accuracy > 0.75, "accuracy {}", report.accuracy);
    assert_eq!(ensemble.evaluation_count(), 40);
    assert_counters_sane(&ensemble);
}

#[test]
fn test_stagger_stream_runs_with_majority_class() {
    let schedule = DriftSchedule {
        drift_every: Some(300),
        noise: 0.0,
        seed: 2,
    };
    let mut ensemble = ReplacementBagging::builder()
        .base_learner(BaseLearner::from_type(BaseLearnerType::MajorityClass))
        .ensemble_size(3)
        .window_size(50)
        .build()
        .unwrap();

    for inst in StaggerGenerator::new(schedule).unwrap().take(900) {
        ensemble.predict(&inst).unwrap();
        ensemble.train(&inst).unwrap();
    }
    assert_eq!(ensemble.instances_trained(), 900);
    assert_eq!(ensemble.evaluation_count(), 18);
    assert_counters_sane(&ensemble);
}
