//! Error types for the HTTP API.
//!
//! Every failure is flattened into `{"error": "<message>"}`. Engine,
//! translation and storage failures are 500; an unknown or invalid download
//! name is 404; a body that does not deserialise is 422.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qcv_ir::IrError;
use qcv_render::RenderError;
use qcv_sim::SimError;
use tokio::task::JoinError;
use tracing::{error, warn};

use crate::dto::ErrorResponse;
use crate::storage::StorageError;
use crate::translate::TranslateError;

/// API error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidBody(String),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Storage(StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Translate(_)
            | ApiError::Simulation(_)
            | ApiError::Render(_)
            | ApiError::Storage(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<IrError> for ApiError {
    fn from(e: IrError) -> Self {
        ApiError::Translate(TranslateError::Ir(e))
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(_) | StorageError::InvalidName(_) => {
                ApiError::NotFound(e.to_string())
            }
            other => ApiError::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        ApiError::Internal(format!("worker task failed: {e}"))
    }
}
