use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::error;

use backend_application::commands::upload_commands;
use backend_application::dtos::UploadAnalysis;
use backend_application::AppState;
use backend_domain::sanitize_file_name;

use crate::error::HttpError;
use crate::middleware::{authorize, parse_transactions};

/// `POST /v1/uploads`: accept one CSV (optionally gzipped) as the `file`
/// part of a multipart form, persist it and return the flagged rows.
pub async fn upload_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadAnalysis>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }

    let (original_name, bytes) = match read_file_part(&mut multipart).await {
        Ok(part) => part,
        Err(err) => {
            state.metrics.record_upload_error();
            return Err(err);
        }
    };

    let batch = match parse_transactions(&bytes) {
        Ok(batch) => batch,
        Err(err) => {
            state.metrics.record_upload_error();
            error!("rejected upload '{}': {}", original_name, err);
            return Err(HttpError::BadRequest(err.to_string()));
        }
    };

    let analysis = upload_commands::process_upload(&state, &original_name, &bytes, batch).await?;
    Ok(Json(analysis))
}

async fn read_file_part(multipart: &mut Multipart) -> Result<(String, Bytes), HttpError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| HttpError::BadRequest(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = sanitize_file_name(field.file_name().unwrap_or_default());
        if original_name.is_empty() {
            return Err(HttpError::BadRequest("no selected file".to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|err| HttpError::BadRequest(err.to_string()))?;
        return Ok((original_name, bytes));
    }
    Err(HttpError::BadRequest("no file part in upload".to_string()))
}
