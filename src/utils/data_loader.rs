//! CSV loading into instance streams

use crate::error::{DriftBaggingError, Result};
use crate::training::Instance;
use ndarray::Array1;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use tracing::{info, warn};

/// Instances read from a table, in file order
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub instances: Vec<Instance>,
    /// Class name for each label index, in first-seen order
    pub class_names: Vec<String>,
    pub feature_names: Vec<String>,
}

impl LabeledDataset {
    pub fn n_classes(&self) -> usize {
        self.class_names.len()
    }
}

/// Loads CSV files and turns them into labelled instances
pub struct DataLoader {
    /// Rows used for schema inference
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 100,
        }
    }

    /// Set the number of rows used to infer column types
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows.max(1);
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path)?;

        let reader = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .into_reader_with_file_handle(file);

        reader.finish().map_err(|e| DriftBaggingError::DataError(e.to_string()))
    }

    /// Load a CSV file and convert it with [`DataLoader::to_instances`]
    pub fn load_instances(&self, path: &str, target: &str) -> Result<LabeledDataset> {
        let df = self.load_csv(path)?;
        let dataset = Self::to_instances(&df, target)?;
        info!(
            path = %path,
            instances = dataset.instances.len(),
            features = dataset.feature_names.len(),
            classes = dataset.n_classes(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Every column except `target` becomes a numeric feature; rows with a
    /// missing label are skipped and missing feature values read as 0.0.
    pub fn to_instances(df: &DataFrame, target: &str) -> Result<LabeledDataset> {
        let feature_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != target)
            .map(|s| s.to_string())
            .collect();

        let target_col = df
            .column(target)
            .map_err(|_| DriftBaggingError::FeatureNotFound(target.to_string()))?
            .cast(&DataType::String)?;
        let labels: Vec<Option<String>> = target_col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();

        let columns: Vec<Vec<f64>> = feature_names
            .iter()
            .map(|name| {
                let col = df
                    .column(name)
                    .map_err(|_| DriftBaggingError::FeatureNotFound(name.clone()))?
                    .cast(&DataType::Float64)?;
                Ok(col.f64()?.into_iter().map(|v| v.unwrap_or(0.0)).collect())
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let mut class_index: HashMap<String, usize> = HashMap::new();
        let mut class_names = Vec::new();
        let mut instances = Vec::with_capacity(df.height());
        let mut skipped = 0usize;

        for (row, label) in labels.into_iter().enumerate() {
            let Some(label) = label else {
                skipped += 1;
                continue;
            };
            let next = class_names.len();
            let idx = *class_index.entry(label.clone()).or_insert_with(|| {
                class_names.push(label);
                next
            });
            let features = Array1::from_iter(columns.iter().map(|c| c[row]));
            instances.push(Instance::new(features, idx));
        }

        if skipped > 0 {
            warn!(skipped, target = %target, "Skipped rows without a label");
        }

        Ok(LabeledDataset {
            instances,
            class_names,
            feature_names,
        })
    }
}
