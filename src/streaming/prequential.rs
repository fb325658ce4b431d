//! Prequential (test-then-train) evaluation
//!
//! Every labelled instance is first used to score the learner and then to
//! train it, so accuracy is always measured on unseen data.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::debug;

use crate::ensemble::ReplacementBagging;
use crate::error::Result;
use crate::training::{BaseLearner, Instance, OnlineClassifier};
use crate::utils::max_index;

/// Anything that can be driven through a prequential loop
pub trait StreamingClassifier {
    /// Score an instance; may update internal bookkeeping
    fn predict_votes(&mut self, instance: &Instance) -> Result<Vec<f64>>;

    fn train_instance(&mut self, instance: &Instance) -> Result<()>;

    fn describe(&self) -> String;
}

impl<M: OnlineClassifier> StreamingClassifier for ReplacementBagging<M> {
    fn predict_votes(&mut self, instance: &Instance) -> Result<Vec<f64>> {
        self.predict(instance)
    }

    fn train_instance(&mut self, instance: &Instance) -> Result<()> {
        self.train(instance)
    }

    fn describe(&self) -> String {
        let template = self
            .members()
            .first()
            .map_or("none", |m| m.model().name());
        format!(
            "replacement_bagging(size={}, window={}, base={})",
            self.ensemble_size(),
            self.window_size(),
            template
        )
    }
}

impl StreamingClassifier for BaseLearner {
    fn predict_votes(&mut self, instance: &Instance) -> Result<Vec<f64>> {
        self.votes_for_instance(instance)
    }

    fn train_instance(&mut self, instance: &Instance) -> Result<()> {
        self.train_on_instance(instance)
    }

    fn describe(&self) -> String {
        self.name().to_string()
    }
}

/// One point of the accuracy curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub instances: usize,
    pub window_accuracy: f64,
    pub cumulative_accuracy: f64,
}

/// Summary of a prequential run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrequentialReport {
    pub learner: String,
    /// Labelled instances scored
    pub instances: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub curve: Vec<CurvePoint>,
    pub elapsed_ms: f64,
    /// Instances per second
    pub throughput: f64,
}

/// Test-then-train driver with a sliding accuracy window
#[derive(Debug, Clone)]
pub struct PrequentialEvaluator {
    window: usize,
    report_every: usize,
    max_instances: Option<usize>,
}

impl Default for PrequentialEvaluator {
    fn default() -> Self {
        Self {
            window: 1000,
            report_every: 1000,
            max_instances: None,
        }
    }
}

impl PrequentialEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the sliding accuracy window
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    /// Emit a curve point every `n` scored instances
    pub fn with_report_every(mut self, n: usize) -> Self {
        self.report_every = n.max(1);
        self
    }

    /// Stop after this many instances
    pub fn with_max_instances(mut self, n: usize) -> Self {
        self.max_instances = Some(n);
        self
    }

    pub fn evaluate<L, I>(&self, learner: &mut L, stream: I) -> Result<PrequentialReport>
    where
        L: StreamingClassifier,
        I: IntoIterator<Item = Instance>,
    {
        let start = Instant::now();
        let limit = self.max_instances.unwrap_or(usize::MAX);

        let mut recent: VecDeque<bool> = VecDeque::with_capacity(self.window);
        let mut recent_correct = 0usize;
        let mut scored = 0usize;
        let mut correct = 0usize;
        let mut seen = 0usize;
        let mut curve = Vec::new();

        for instance in stream.into_iter().take(limit) {
            seen += 1;
            let votes = learner.predict_votes(&instance)?;

            if let Some(label) = instance.label {
                let hit = max_index(&votes) == Some(label);
                scored += 1;
                if hit {
                    correct += 1;
                    recent_correct += 1;
                }
                recent.push_back(hit);
                if recent.len() > self.window && recent.pop_front() == Some(true) {
                    recent_correct -= 1;
                }

                if scored % self.report_every == 0 {
                    let point = CurvePoint {
                        instances: scored,
                        window_accuracy: recent_correct as f64 / recent.len() as f64,
                        cumulative_accuracy: correct as f64 / scored as f64,
                    };
                    debug!(
                        instances = point.instances,
                        window_accuracy = point.window_accuracy,
                        "Prequential checkpoint"
                    );
                    curve.push(point);
                }
            }

            learner.train_instance(&instance)?;
        }

        let elapsed = start.elapsed().as_secs_f64();
        Ok(PrequentialReport {
            learner: learner.describe(),
            instances: scored,
            correct,
            accuracy: if scored > 0 { correct as f64 / scored as f64 } else { 0.0 },
            curve,
            elapsed_ms: elapsed * 1000.0,
            throughput: if elapsed > 0.0 { seen as f64 / elapsed } else { 0.0 },
        })
    }
}
