//! Artifact download endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::StorageError;

/// GET /download/{file_name} - Return an artifact as an attachment.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.store.read(&file_name).await?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|_| StorageError::InvalidName(file_name.clone()))?;

    debug!(file = %file_name, bytes = bytes.len(), "Serving download");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
