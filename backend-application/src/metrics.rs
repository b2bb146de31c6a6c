use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    upload_requests: AtomicU64,
    upload_rows: AtomicU64,
    upload_errors: AtomicU64,
    anomalies: AtomicU64,
}

impl Metrics {
    pub fn record_upload(&self, row_count: usize) {
        self.upload_requests.fetch_add(1, Ordering::Relaxed);
        self.upload_rows
            .fetch_add(row_count as u64, Ordering::Relaxed);
    }

    pub fn record_upload_error(&self) {
        self.upload_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_anomalies(&self, count: usize) {
        self.anomalies.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.upload_requests.load(Ordering::Relaxed);
        let rows = self.upload_rows.load(Ordering::Relaxed);
        let errors = self.upload_errors.load(Ordering::Relaxed);
        let anomalies = self.anomalies.load(Ordering::Relaxed);

        format!(
            "# TYPE leakwatch_upload_requests_total counter\n\
leakwatch_upload_requests_total {}\n\
# TYPE leakwatch_upload_rows_total counter\n\
leakwatch_upload_rows_total {}\n\
# TYPE leakwatch_upload_errors_total counter\n\
leakwatch_upload_errors_total {}\n\
# TYPE leakwatch_anomalies_total counter\n\
leakwatch_anomalies_total {}\n",
            requests, rows, errors, anomalies
        )
    }
}
