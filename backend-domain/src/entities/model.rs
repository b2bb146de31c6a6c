use serde::{Deserialize, Serialize};

/// Detector parameters as they reach the scoring service. Defaults mirror
/// the reference setup the service was tuned against: 100 trees, 256-row
/// sub-samples, 1% contamination, fixed seed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub trees: usize,
    pub sample_size: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            sample_size: 256,
            contamination: 0.01,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub upload_dir: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub detector: DetectorConfig,
    pub upload_retention_minutes: u64,
    pub sweep_interval_minutes: u64,
    pub delete_after_processing: bool,
}

#[derive(Debug, Deserialize)]
pub struct UploadListQuery {
    pub limit: Option<usize>,
}
