use tracing::warn;

use crate::dtos::{UploadAnalysis, UploadSummary};
use crate::{AppError, AppState};
use backend_domain::services::{prepare_batch, LeakDetector};
use backend_domain::{TransactionBatch, UploadKey};

/// Run one upload through the full pipeline: persist the raw file, rescale
/// the batch, fit a fresh forest and collect the flagged rows. The stored
/// file outlives failed analyses so a rejected upload can be inspected;
/// only a successful run honors `delete_after_processing`.
pub async fn process_upload(
    state: &AppState,
    original_name: &str,
    bytes: &[u8],
    mut batch: TransactionBatch,
) -> Result<UploadAnalysis, AppError> {
    let key = UploadKey::generate();
    let stored = match state.upload_store.save(&key, original_name, bytes).await {
        Ok(stored) => stored,
        Err(err) => {
            state.metrics.record_upload_error();
            return Err(AppError::Internal(err));
        }
    };

    if let Err(err) = prepare_batch(&mut batch) {
        state.metrics.record_upload_error();
        return Err(AppError::BadRequest(err.to_string()));
    }

    let detector = LeakDetector::new(state.config.detector);
    let report = match detector.detect(&batch) {
        Ok(report) => report,
        Err(err) => {
            state.metrics.record_upload_error();
            return Err(AppError::BadRequest(err.to_string()));
        }
    };

    state.metrics.record_upload(batch.row_count());
    if report.anomaly_count() > 0 {
        state.metrics.record_anomalies(report.anomaly_count());
    }

    if state.config.delete_after_processing {
        if let Err(err) = state.upload_store.remove(&stored.key).await {
            warn!("failed to remove processed upload {}: {}", stored.key, err);
        }
    }

    let anomalies = report
        .anomaly_rows
        .iter()
        .map(|&row| batch.row_object(row))
        .collect();

    Ok(UploadAnalysis {
        status: "success".to_string(),
        columns: batch.columns.clone(),
        anomalies,
        summary: UploadSummary {
            upload_key: stored.key.to_string(),
            rows: batch.row_count(),
            anomaly_count: report.anomaly_count(),
            feature_columns: report.feature_columns,
        },
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use backend_domain::ports::UploadStore;
    use backend_domain::{DetectorConfig, RuntimeConfig, StoredUpload};

    use super::*;
    use crate::Metrics;

    #[derive(Default)]
    struct RecordingStore {
        saves: AtomicUsize,
        removes: AtomicUsize,
    }

    #[async_trait]
    impl UploadStore for RecordingStore {
        async fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn save(
            &self,
            key: &UploadKey,
            original_name: &str,
            bytes: &[u8],
        ) -> anyhow::Result<StoredUpload> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(StoredUpload {
                key: key.clone(),
                original_name: original_name.to_string(),
                size_bytes: bytes.len() as u64,
                checksum_sha256: String::new(),
                stored_at_ms: 0,
            })
        }

        async fn list(&self, _limit: usize) -> anyhow::Result<Vec<StoredUpload>> {
            Ok(Vec::new())
        }

        async fn remove(&self, _key: &UploadKey) -> anyhow::Result<()> {
            self.removes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn sweep_older_than(&self, _cutoff_ms: i64) -> anyhow::Result<usize> {
            Ok(0)
        }
    }

    fn test_state(store: Arc<RecordingStore>, delete_after_processing: bool) -> AppState {
        AppState {
            config: RuntimeConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                api_token: None,
                upload_dir: "uploads".to_string(),
                max_body_bytes: 1024 * 1024,
                request_timeout_seconds: 30,
                detector: DetectorConfig::default(),
                upload_retention_minutes: 0,
                sweep_interval_minutes: 15,
                delete_after_processing,
            },
            upload_store: store,
            metrics: Arc::new(Metrics::default()),
        }
    }

    fn three_row_batch() -> TransactionBatch {
        TransactionBatch::from_rows(
            vec!["Time".into(), "Amount".into(), "type".into()],
            vec![
                vec!["0".into(), "10".into(), "TRANSFER".into()],
                vec!["1".into(), "1000000".into(), "CASH_OUT".into()],
                vec!["2".into(), "12".into(), "PAYMENT".into()],
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn stores_the_file_and_flags_the_extreme_row() {
        let store = Arc::new(RecordingStore::default());
        let state = test_state(store.clone(), false);

        let analysis = process_upload(&state, "transactions.csv", b"raw", three_row_batch())
            .await
            .expect("analysis");

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(store.removes.load(Ordering::SeqCst), 0);
        assert_eq!(analysis.status, "success");
        assert_eq!(analysis.columns, vec!["Amount".to_string(), "type".to_string()]);
        assert_eq!(analysis.summary.rows, 3);
        assert_eq!(analysis.summary.anomaly_count, 1);
        assert_eq!(analysis.anomalies.len(), 1);
        assert_eq!(analysis.anomalies[0]["type"], serde_json::json!("CASH_OUT"));
        assert_eq!(analysis.anomalies[0]["Amount"], serde_json::json!(1.0));
    }

    #[tokio::test]
    async fn delete_after_processing_removes_the_stored_file() {
        let store = Arc::new(RecordingStore::default());
        let state = test_state(store.clone(), true);

        process_upload(&state, "transactions.csv", b"raw", three_row_batch())
            .await
            .expect("analysis");

        assert_eq!(store.removes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn text_amount_column_is_a_client_error() {
        let store = Arc::new(RecordingStore::default());
        let state = test_state(store.clone(), false);
        let batch = TransactionBatch::from_rows(
            vec!["Amount".into()],
            vec![vec!["10".into()], vec!["lots".into()]],
        )
        .unwrap();

        let err = process_upload(&state, "bad.csv", b"raw", batch)
            .await
            .expect_err("reject batch");

        assert!(matches!(err, AppError::BadRequest(_)));
        let rendered = state.metrics.render_prometheus();
        assert!(rendered.contains("leakwatch_upload_errors_total 1"));
        assert!(rendered.contains("leakwatch_upload_requests_total 0"));
    }
}
