use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use backend_domain::ports::UploadStore;
use backend_domain::{current_millis, sanitize_file_name, StoredUpload, UploadKey};

use crate::utils::sha256_hex;

const META_SUFFIX: &str = ".meta.json";

/// Filesystem-backed upload store. Each upload becomes two files under the
/// root directory: `<key>.csv` with the raw bytes exactly as received and
/// `<key>.meta.json` with the `StoredUpload` record. The key is a server
/// generated UUID, so concurrent saves never contend for a path.
pub struct FsUploadStore {
    root: PathBuf,
}

impl FsUploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_path(&self, key: &UploadKey) -> PathBuf {
        self.root.join(format!("{key}.csv"))
    }

    fn meta_path(&self, key: &UploadKey) -> PathBuf {
        self.root.join(format!("{key}{META_SUFFIX}"))
    }

    async fn read_meta(&self, path: &Path) -> Option<StoredUpload> {
        let content = fs::read_to_string(path).await.ok()?;
        match serde_json::from_str(&content) {
            Ok(meta) => Some(meta),
            Err(err) => {
                warn!("ignoring unreadable upload metadata {}: {}", path.display(), err);
                None
            }
        }
    }

    async fn all_meta(&self) -> anyhow::Result<Vec<StoredUpload>> {
        let mut uploads = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(uploads),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(stem) = name.strip_suffix(META_SUFFIX) else {
                continue;
            };
            if UploadKey::parse(stem).is_none() {
                continue;
            }
            if let Some(meta) = self.read_meta(&path).await {
                uploads.push(meta);
            }
        }
        Ok(uploads)
    }
}

async fn remove_if_exists(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[async_trait]
impl UploadStore for FsUploadStore {
    async fn ping(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root).await?;
        let probe = self.root.join(".leakwatch-probe");
        fs::write(&probe, b"ok").await?;
        fs::remove_file(&probe).await?;
        Ok(())
    }

    async fn save(
        &self,
        key: &UploadKey,
        original_name: &str,
        bytes: &[u8],
    ) -> anyhow::Result<StoredUpload> {
        fs::create_dir_all(&self.root).await?;
        fs::write(self.data_path(key), bytes).await?;

        let stored = StoredUpload {
            key: key.clone(),
            original_name: sanitize_file_name(original_name),
            size_bytes: bytes.len() as u64,
            checksum_sha256: sha256_hex(bytes),
            stored_at_ms: current_millis(),
        };
        let meta = serde_json::to_string(&stored)?;
        fs::write(self.meta_path(key), meta).await?;
        Ok(stored)
    }

    async fn list(&self, limit: usize) -> anyhow::Result<Vec<StoredUpload>> {
        let mut uploads = self.all_meta().await?;
        uploads.sort_by(|a, b| b.stored_at_ms.cmp(&a.stored_at_ms));
        uploads.truncate(limit);
        Ok(uploads)
    }

    async fn remove(&self, key: &UploadKey) -> anyhow::Result<()> {
        remove_if_exists(&self.data_path(key)).await?;
        remove_if_exists(&self.meta_path(key)).await?;
        Ok(())
    }

    async fn sweep_older_than(&self, cutoff_ms: i64) -> anyhow::Result<usize> {
        let mut removed = 0;
        for meta in self.all_meta().await? {
            if meta.stored_at_ms < cutoff_ms {
                self.remove(&meta.key).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
