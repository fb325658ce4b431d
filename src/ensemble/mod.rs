//! Ensemble module
//!
//! Online bagging ensemble that follows concept drift:
//! - Poisson(1) resampling to simulate bootstrap replicates of a stream
//! - Running accuracy per member and for a non-voting candidate
//! - Windowed replacement of the weakest member by the candidate
//! - Accuracy-weighted vote aggregation

mod bagging;
mod config;
mod member;
mod performance;
mod replacement;
mod resampler;
mod voting;

pub use bagging::{EnsembleMeasurements, ReplacementBagging, ReplacementBaggingBuilder};
pub use config::EnsembleConfig;
pub use member::EnsembleMember;
pub use performance::PerformanceTracker;
pub use replacement::{ReplacementDecision, ReplacementPolicy};
pub use resampler::PoissonResampler;
pub use voting::{AccuracyWeightedVote, VoteCombination};
