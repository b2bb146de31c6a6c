// Stored upload entity
// Metadata for one CSV file kept under the upload directory

use serde::{Deserialize, Serialize};

use crate::value_objects::UploadKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUpload {
    pub key: UploadKey,
    pub original_name: String,
    pub size_bytes: u64,
    pub checksum_sha256: String,
    pub stored_at_ms: i64,
}

impl StoredUpload {
    pub fn age_minutes(&self, now_ms: i64) -> i64 {
        (now_ms - self.stored_at_ms) / 60_000
    }
}
