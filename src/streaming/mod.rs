//! Streaming evaluation
//!
//! Synthetic drifting streams and a prequential (test-then-train) evaluator
//! for driving learners one instance at a time.

pub mod generators;
pub mod prequential;

pub use generators::{DriftSchedule, SeaGenerator, StaggerGenerator};
pub use prequential::{CurvePoint, PrequentialEvaluator, PrequentialReport, StreamingClassifier};
