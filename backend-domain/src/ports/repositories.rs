use async_trait::async_trait;

use crate::entities::StoredUpload;
use crate::value_objects::UploadKey;

#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Verify the backing storage is reachable and writable.
    async fn ping(&self) -> anyhow::Result<()>;
    /// Persist one upload under `key` and return its metadata record.
    async fn save(
        &self,
        key: &UploadKey,
        original_name: &str,
        bytes: &[u8],
    ) -> anyhow::Result<StoredUpload>;
    /// Newest-first metadata listing, at most `limit` entries.
    async fn list(&self, limit: usize) -> anyhow::Result<Vec<StoredUpload>>;
    async fn remove(&self, key: &UploadKey) -> anyhow::Result<()>;
    /// Delete uploads stored before `cutoff_ms`. Returns how many were removed.
    async fn sweep_older_than(&self, cutoff_ms: i64) -> anyhow::Result<usize>;
}
