use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DetectorConfig, RuntimeConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub upload_dir: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub detector_trees: usize,
    pub detector_sample_size: usize,
    pub detector_contamination: f64,
    pub detector_seed: u64,
    pub upload_retention_minutes: u64,
    pub sweep_interval_minutes: u64,
    pub delete_after_processing: bool,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            upload_dir: "./uploads".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
            request_timeout_seconds: 30,
            detector_trees: 100,
            detector_sample_size: 256,
            detector_contamination: 0.01,
            detector_seed: 42,
            upload_retention_minutes: 24 * 60,
            sweep_interval_minutes: 15,
            delete_after_processing: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("LEAKWATCH_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(log_dir) = &self.log_dir {
            if log_dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
        self.upload_dir = self.upload_dir.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.upload_dir = resolve_path(base, &self.upload_dir);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.upload_dir.is_empty() {
            return Err(anyhow!("upload_dir must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.detector_trees == 0 {
            return Err(anyhow!("detector_trees must be greater than 0"));
        }
        if self.detector_sample_size < 2 {
            return Err(anyhow!("detector_sample_size must be at least 2"));
        }
        if !(self.detector_contamination > 0.0 && self.detector_contamination <= 0.5) {
            return Err(anyhow!("detector_contamination must be in (0, 0.5]"));
        }
        if self.upload_retention_minutes > 0 && self.sweep_interval_minutes == 0 {
            return Err(anyhow!(
                "sweep_interval_minutes must be greater than 0 when retention is enabled"
            ));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            upload_dir: self.upload_dir.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            detector: DetectorConfig {
                trees: self.detector_trees,
                sample_size: self.detector_sample_size,
                contamination: self.detector_contamination,
                seed: self.detector_seed,
            },
            upload_retention_minutes: self.upload_retention_minutes,
            sweep_interval_minutes: self.sweep_interval_minutes,
            delete_after_processing: self.delete_after_processing,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("LEAKWATCH_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("LEAKWATCH_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("LEAKWATCH_UPLOAD_DIR") {
            self.upload_dir = value;
        }
        if let Ok(value) = env::var("LEAKWATCH_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("LEAKWATCH_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("LEAKWATCH_DETECTOR_TREES") {
            self.detector_trees = value.parse().unwrap_or(self.detector_trees);
        }
        if let Ok(value) = env::var("LEAKWATCH_DETECTOR_SAMPLE_SIZE") {
            self.detector_sample_size = value.parse().unwrap_or(self.detector_sample_size);
        }
        if let Ok(value) = env::var("LEAKWATCH_DETECTOR_CONTAMINATION") {
            self.detector_contamination = value.parse().unwrap_or(self.detector_contamination);
        }
        if let Ok(value) = env::var("LEAKWATCH_DETECTOR_SEED") {
            self.detector_seed = value.parse().unwrap_or(self.detector_seed);
        }
        if let Ok(value) = env::var("LEAKWATCH_UPLOAD_RETENTION_MINUTES") {
            self.upload_retention_minutes = value.parse().unwrap_or(self.upload_retention_minutes);
        }
        if let Ok(value) = env::var("LEAKWATCH_SWEEP_INTERVAL_MINUTES") {
            self.sweep_interval_minutes = value.parse().unwrap_or(self.sweep_interval_minutes);
        }
        if let Ok(value) = env::var("LEAKWATCH_DELETE_AFTER_PROCESSING") {
            self.delete_after_processing = value.parse().unwrap_or(self.delete_after_processing);
        }
        if let Ok(value) = env::var("LEAKWATCH_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
