use std::sync::Arc;

use anyhow::Result;

use backend_application::{AppState, Metrics};
use backend_domain::ports::UploadStore;
use backend_infrastructure::{AppConfig, FsUploadStore};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let upload_store = Arc::new(FsUploadStore::new(runtime_config.upload_dir.clone()));
        // Fail fast when the upload directory cannot be created or written.
        upload_store.ping().await?;

        let state = AppState {
            config: runtime_config,
            upload_store,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
