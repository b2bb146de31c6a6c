// Response payloads assembled by commands and queries

use serde::Serialize;
use serde_json::Value;

/// Body of a successful upload analysis. `columns` carries the display
/// order of the processed batch since JSON objects do not keep field order;
/// `anomalies` holds the flagged rows keyed by column name.
#[derive(Debug, Serialize)]
pub struct UploadAnalysis {
    pub status: String,
    pub columns: Vec<String>,
    pub anomalies: Vec<serde_json::Map<String, Value>>,
    pub summary: UploadSummary,
}

#[derive(Debug, Serialize)]
pub struct UploadSummary {
    pub upload_key: String,
    pub rows: usize,
    pub anomaly_count: usize,
    pub feature_columns: Vec<String>,
}
