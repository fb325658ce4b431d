//! Incremental base learners
//!
//! Provides the capability trait every ensemble slot is built on, plus two
//! concrete learners:
//! - Gaussian Naive Bayes (weighted, single pass)
//! - Majority class baseline

mod base_learner;
mod instance;
mod models;
pub mod majority_class;
pub mod naive_bayes;

pub use base_learner::{BaseLearner, BaseLearnerType};
pub use instance::Instance;
pub use majority_class::MajorityClass;
pub use models::OnlineClassifier;
pub use naive_bayes::GaussianNaiveBayes;
