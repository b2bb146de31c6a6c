// Leak detector
// Builds the feature matrix for a preprocessed batch, fits a fresh forest
// on it and flags the rows scoring above the contamination quantile.

use thiserror::Error;

use crate::entities::{DetectionReport, DetectorConfig, TransactionBatch};
use crate::services::forest::{quantile, IsolationForest};

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("upload has no numeric columns to score")]
    NoFeatureColumns,
}

/// Scores one batch per call. A new forest is fitted for every request, so
/// nothing learned from one upload can bleed into the next.
#[derive(Debug, Clone)]
pub struct LeakDetector {
    config: DetectorConfig,
}

impl LeakDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, batch: &TransactionBatch) -> Result<DetectionReport, DetectError> {
        let feature_indices = batch.numeric_columns();
        if feature_indices.is_empty() {
            return Err(DetectError::NoFeatureColumns);
        }
        let feature_columns: Vec<String> = feature_indices
            .iter()
            .map(|&index| batch.columns[index].clone())
            .collect();

        let matrix: Vec<Vec<f64>> = batch
            .rows
            .iter()
            .map(|row| {
                feature_indices
                    .iter()
                    .map(|&index| row[index].as_f64().unwrap_or_default())
                    .collect()
            })
            .collect();

        // A single row cannot stand out from itself.
        if matrix.len() < 2 {
            return Ok(DetectionReport {
                anomaly_rows: Vec::new(),
                scores: vec![0.5; matrix.len()],
                threshold: 1.0,
                feature_columns,
            });
        }

        let forest = IsolationForest::fit(&matrix, &self.config);
        let scores = forest.score_all(&matrix);
        let threshold = quantile(&scores, 1.0 - self.config.contamination);
        let anomaly_rows = scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score > threshold)
            .map(|(index, _)| index)
            .collect();

        Ok(DetectionReport { anomaly_rows, scores, threshold, feature_columns })
    }
}
