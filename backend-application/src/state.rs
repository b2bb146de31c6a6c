use std::sync::Arc;

use backend_domain::ports::UploadStore;
use backend_domain::RuntimeConfig;

use crate::Metrics;

/// Shared request state. Note there is no detector instance here: a fresh
/// forest is fitted inside each upload command, so requests share only the
/// configuration, the store and the counters.
#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub upload_store: Arc<dyn UploadStore>,
    pub metrics: Arc<Metrics>,
}
