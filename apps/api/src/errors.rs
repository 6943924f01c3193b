use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::applications::repository::RepositoryError;
use crate::models::application::ApplicationStatus;
use crate::storage::BlobError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The public form id did not resolve. Distinct from `NotFound` so the
    /// applicant learns the link is dead instead of retrying the submission.
    #[error("No job for public form id {0}")]
    JobNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    /// Blob write/read could not reach the durable medium. Retrying the whole
    /// submission is safe: no record is created until the blob is committed.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<BlobError> for AppError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::Unavailable(msg) => AppError::StorageUnavailable(msg),
            BlobError::NotFound(id) => AppError::NotFound(format!("Blob {id} not found")),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound("Record not found".to_string()),
            RepositoryError::InvalidTransition { from, to } => {
                AppError::InvalidTransition { from, to }
            }
            RepositoryError::Unavailable(msg) => AppError::RepositoryUnavailable(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::JobNotFound(_) => (
                StatusCode::NOT_FOUND,
                "JOB_NOT_FOUND",
                "This application link is no longer valid".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidTransition { from, to } => (
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
                format!("Cannot move application from '{from}' to '{to}'"),
            ),
            AppError::StorageUnavailable(msg) => {
                tracing::error!("Blob storage unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORAGE_UNAVAILABLE",
                    "Could not store the uploaded file, please try again later".to_string(),
                )
            }
            AppError::RepositoryUnavailable(msg) => {
                tracing::error!("Repository unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "REPOSITORY_UNAVAILABLE",
                    "The service is temporarily unavailable, please try again later".to_string(),
                )
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
