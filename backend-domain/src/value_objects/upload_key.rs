// Upload key value object

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-generated identifier for a stored upload. Keys are minted fresh
/// per request so concurrent uploads never collide on disk, and the client
/// supplied file name never becomes a storage path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadKey(pub String);

impl UploadKey {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a key back from a stored file stem, normalizing to hyphenated
    /// form. Non-UUID names in the upload directory are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let parsed = Uuid::try_parse(raw).ok()?;
        Some(Self(parsed.as_hyphenated().to_string()))
    }
}

impl std::fmt::Display for UploadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
