// Detection report entity
// The outcome of scoring one uploaded batch

use serde::{Deserialize, Serialize};

/// Result of fitting the detector on a batch: which rows were flagged and
/// the scores behind the call. Row indices are in upload order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub anomaly_rows: Vec<usize>,
    pub scores: Vec<f64>,
    pub threshold: f64,
    pub feature_columns: Vec<String>,
}

impl DetectionReport {
    pub fn anomaly_count(&self) -> usize {
        self.anomaly_rows.len()
    }
}
