use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::models::repositories::RepositoryError;
use crate::modules::storage::StorageError;
use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Upload failed: {0}")]
    UploadFailed(#[from] StorageError),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(#[from] RepositoryError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UploadFailed(_)
            | AppError::PersistenceFailed(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, details) = match self {
            AppError::NotFound(ref msg) => (msg.clone(), None),
            AppError::Validation(ref msg) => (msg.clone(), None),
            AppError::BadRequest(ref msg) => (msg.clone(), None),
            AppError::MethodNotAllowed => ("Method not allowed".to_string(), None),
            AppError::UploadFailed(ref e) => {
                tracing::error!("Storage upload failed: {}", e);
                (
                    "Failed to upload file to storage".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::PersistenceFailed(ref e) => {
                tracing::error!("Model record insert failed: {}", e);
                (
                    "Failed to save model record".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), Some(msg.clone()))
            }
        };

        // Diagnostic detail never leaves release builds
        let details = details.filter(|_| cfg!(debug_assertions));

        (status, Json(ErrorResponse::new(message, details))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
