//! Utility functions and types

pub mod data_loader;
mod votes;

pub use data_loader::{DataLoader, LabeledDataset};
pub use votes::{max_index, total_mass};
