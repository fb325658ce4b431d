//! Synthetic streams with abrupt concept drift
//!
//! Both generators are endless iterators; bound them with `take`.

use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DriftBaggingError, Result};
use crate::training::Instance;

/// Decision thresholds of the four SEA concepts
const SEA_THRESHOLDS: [f64; 4] = [8.0, 9.0, 7.0, 9.5];

/// Common generator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftSchedule {
    /// Instances between concept switches, `None` for a stationary stream
    pub drift_every: Option<usize>,
    /// Probability of flipping the label
    pub noise: f64,
    pub seed: u64,
}

impl Default for DriftSchedule {
    fn default() -> Self {
        Self {
            drift_every: None,
            noise: 0.0,
            seed: 1,
        }
    }
}

impl DriftSchedule {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(DriftBaggingError::InvalidParameter {
                name: "noise".to_string(),
                value: self.noise.to_string(),
                reason: "must be within [0, 1]".to_string(),
            });
        }
        if self.drift_every == Some(0) {
            return Err(DriftBaggingError::InvalidParameter {
                name: "drift_every".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    fn concept_at(&self, index: usize, first: usize, n_concepts: usize) -> usize {
        match self.drift_every {
            Some(every) => (first + index / every) % n_concepts,
            None => first % n_concepts,
        }
    }
}

/// SEA concepts: three uniform features in [0, 10], two of them relevant.
///
/// The label is 0 when `f1 + f2 <= θ` and 1 otherwise, with θ cycling
/// through 8, 9, 7 and 9.5.
#[derive(Debug, Clone)]
pub struct SeaGenerator {
    schedule: DriftSchedule,
    first_concept: usize,
    rng: ChaCha8Rng,
    emitted: usize,
}

impl SeaGenerator {
    pub fn new(schedule: DriftSchedule) -> Result<Self> {
        schedule.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(schedule.seed),
            schedule,
            first_concept: 0,
            emitted: 0,
        })
    }

    /// Start from a given concept (0..4)
    pub fn with_first_concept(mut self, concept: usize) -> Self {
        self.first_concept = concept % SEA_THRESHOLDS.len();
        self
    }

    /// Concept that labels the next instance
    pub fn current_concept(&self) -> usize {
        self.schedule
            .concept_at(self.emitted, self.first_concept, SEA_THRESHOLDS.len())
    }
}

impl Iterator for SeaGenerator {
    type Item = Instance;

    fn next(&mut self) -> Option<Instance> {
        let threshold = SEA_THRESHOLDS[self.current_concept()];
        let features: Vec<f64> = (0..3).map(|_| self.rng.gen_range(0.0..10.0)).collect();

        let mut label = if features[0] + features[1] <= threshold { 0 } else { 1 };
        if self.rng.gen::<f64>() < self.schedule.noise {
            label = 1 - label;
        }

        self.emitted += 1;
        Some(Instance::new(Array1::from(features), label))
    }
}

/// STAGGER concepts over one-hot size, colour and shape attributes.
///
/// Concepts: `size = small ∧ colour = red`, `colour = green ∨ shape = circle`,
/// `size ∈ {medium, large}`.
#[derive(Debug, Clone)]
pub struct StaggerGenerator {
    schedule: DriftSchedule,
    rng: ChaCha8Rng,
    emitted: usize,
}

impl StaggerGenerator {
    pub fn new(schedule: DriftSchedule) -> Result<Self> {
        schedule.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(schedule.seed),
            schedule,
            emitted: 0,
        })
    }

    pub fn current_concept(&self) -> usize {
        self.schedule.concept_at(self.emitted, 0, 3)
    }

    fn concept_label(concept: usize, size: usize, colour: usize, shape: usize) -> usize {
        let positive = match concept {
            0 => size == 0 && colour == 0,
            1 => colour == 1 || shape == 0,
            _ => size >= 1,
        };
        usize::from(positive)
    }
}

impl Iterator for StaggerGenerator {
    type Item = Instance;

    fn next(&mut self) -> Option<Instance> {
        let size = self.rng.gen_range(0..3);
        let colour = self.rng.gen_range(0..3);
        let shape = self.rng.gen_range(0..3);

        let mut features = Array1::zeros(9);
        features[size] = 1.0;
        features[3 + colour] = 1.0;
        features[6 + shape] = 1.0;

        let mut label = Self::concept_label(self.current_concept(), size, colour, shape);
        if self.rng.gen::<f64>() < self.schedule.noise {
            label = 1 - label;
        }

        self.emitted += 1;
        Some(Instance::new(features, label))
    }
}
