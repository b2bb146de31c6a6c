use tracing::error;

use crate::{AppError, AppState};
use backend_domain::{StoredUpload, UploadListQuery};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

pub async fn list_uploads(
    state: &AppState,
    query: UploadListQuery,
) -> Result<Vec<StoredUpload>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let uploads = state.upload_store.list(limit).await.map_err(|err| {
        error!("failed to list uploads: {}", err);
        AppError::Internal(err)
    })?;
    Ok(uploads)
}
