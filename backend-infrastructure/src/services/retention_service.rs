use std::time::Duration;

use tracing::{error, info};

use backend_application::AppState;
use backend_domain::current_millis;

/// Periodic cleanup of the upload directory. Runs forever once spawned;
/// does nothing when retention is configured to zero (keep files for good).
pub async fn schedule_retention(state: AppState) {
    let retention_minutes = state.config.upload_retention_minutes;
    if retention_minutes == 0 {
        info!("upload retention disabled, sweeper not started");
        return;
    }

    let interval = Duration::from_secs(state.config.sweep_interval_minutes.max(1) * 60);
    loop {
        tokio::time::sleep(interval).await;

        let cutoff = current_millis() - (retention_minutes as i64) * 60_000;
        match state.upload_store.sweep_older_than(cutoff).await {
            Ok(0) => {}
            Ok(removed) => info!("retention sweep removed {} expired uploads", removed),
            Err(err) => error!("retention sweep failed: {}", err),
        }
    }
}
