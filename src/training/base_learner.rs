//! Runtime selection of the base learner

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::instance::Instance;
use super::majority_class::MajorityClass;
use super::models::OnlineClassifier;
use super::naive_bayes::GaussianNaiveBayes;
use crate::error::{DriftBaggingError, Result};

/// Kind of base learner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BaseLearnerType {
    #[default]
    NaiveBayes,
    MajorityClass,
}

impl fmt::Display for BaseLearnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseLearnerType::NaiveBayes => write!(f, "naive_bayes"),
            BaseLearnerType::MajorityClass => write!(f, "majority_class"),
        }
    }
}

impl FromStr for BaseLearnerType {
    type Err = DriftBaggingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "naive_bayes" | "nb" | "gaussian_naive_bayes" => Ok(BaseLearnerType::NaiveBayes),
            "majority_class" | "majority" => Ok(BaseLearnerType::MajorityClass),
            other => Err(DriftBaggingError::InvalidParameter {
                name: "base_learner".to_string(),
                value: other.to_string(),
                reason: "expected naive_bayes or majority_class".to_string(),
            }),
        }
    }
}

/// A base learner chosen at runtime, usable as an ensemble template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BaseLearner {
    NaiveBayes(GaussianNaiveBayes),
    MajorityClass(MajorityClass),
}

impl BaseLearner {
    /// Untrained learner of the given kind
    pub fn from_type(kind: BaseLearnerType) -> Self {
        match kind {
            BaseLearnerType::NaiveBayes => BaseLearner::NaiveBayes(GaussianNaiveBayes::new()),
            BaseLearnerType::MajorityClass => BaseLearner::MajorityClass(MajorityClass::new()),
        }
    }

    pub fn kind(&self) -> BaseLearnerType {
        match self {
            BaseLearner::NaiveBayes(_) => BaseLearnerType::NaiveBayes,
            BaseLearner::MajorityClass(_) => BaseLearnerType::MajorityClass,
        }
    }
}

impl Default for BaseLearner {
    fn default() -> Self {
        Self::from_type(BaseLearnerType::default())
    }
}

impl OnlineClassifier for BaseLearner {
    fn train_on_instance(&mut self, instance: &Instance) -> Result<()> {
        match self {
            BaseLearner::NaiveBayes(m) => m.train_on_instance(instance),
            BaseLearner::MajorityClass(m) => m.train_on_instance(instance),
        }
    }

    fn votes_for_instance(&self, instance: &Instance) -> Result<Vec<f64>> {
        match self {
            BaseLearner::NaiveBayes(m) => m.votes_for_instance(instance),
            BaseLearner::MajorityClass(m) => m.votes_for_instance(instance),
        }
    }

    fn reset(&mut self) {
        match self {
            BaseLearner::NaiveBayes(m) => m.reset(),
            BaseLearner::MajorityClass(m) => m.reset(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            BaseLearner::NaiveBayes(m) => m.name(),
            BaseLearner::MajorityClass(m) => m.name(),
        }
    }
}
