//! drift-bagging - Online bagging that follows concept drift
//!
//! An ensemble of incremental classifiers trained with Poisson(1) online
//! bootstrap. A non-voting candidate is trained alongside the members and,
//! once per window of prediction queries, replaces the weakest member if its
//! running accuracy is strictly higher.
//!
//! # Modules
//!
//! - [`ensemble`] - Resampler, performance tracking, replacement policy, voting
//! - [`training`] - Base learner trait, instances, incremental learners
//! - [`streaming`] - Drifting stream generators and prequential evaluation
//! - [`utils`] - CSV loading and score-vector helpers
//! - [`cli`] - Command-line interface

pub mod error;

pub mod ensemble;
pub mod training;

pub mod streaming;
pub mod utils;

pub mod cli;

pub use error::{DriftBaggingError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{DriftBaggingError, Result};

    pub use crate::ensemble::{
        EnsembleConfig, EnsembleMeasurements, ReplacementBagging, ReplacementBaggingBuilder,
        VoteCombination,
    };

    pub use crate::training::{
        BaseLearner, BaseLearnerType, GaussianNaiveBayes, Instance, MajorityClass, OnlineClassifier,
    };

    pub use crate::streaming::{
        DriftSchedule, PrequentialEvaluator, PrequentialReport, SeaGenerator, StaggerGenerator,
        StreamingClassifier,
    };

    pub use crate::utils::{max_index, DataLoader};
}
