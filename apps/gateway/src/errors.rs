use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::analysis::scoring_client::ScoringError;
use crate::extraction::ExtractionRunError;

pub const MISSING_FILE_MESSAGE: &str = "No file uploaded";
pub const EXTRACTION_FAILURE_MESSAGE: &str = "Error extracting text from file";
pub const EXTRACTION_TIMEOUT_MESSAGE: &str = "Timed out extracting text from file";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Error calling ML service";

/// Gateway error type. Implements `IntoResponse` so handlers can return
/// `Result<T, AppError>`; this is the only place errors become HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no file uploaded")]
    MissingFile,

    /// Carries the user-facing message naming the supported formats.
    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("malformed upload: {0}")]
    MalformedUpload(String),

    #[error("upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("extraction timed out")]
    ExtractionTimeout,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("scoring service error: {message}")]
    Upstream { message: String, details: Value },

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionRunError> for AppError {
    fn from(err: ExtractionRunError) -> Self {
        match err {
            ExtractionRunError::TimedOut(_) => AppError::ExtractionTimeout,
            other => AppError::ExtractionFailure(other.to_string()),
        }
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        AppError::Upstream {
            message: err.to_string(),
            details: err.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MissingFile => (
                StatusCode::BAD_REQUEST,
                json!({ "error": MISSING_FILE_MESSAGE }),
            ),
            AppError::UnsupportedFormat(msg) | AppError::MalformedUpload(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": format!("Uploaded file exceeds the {limit} byte limit") }),
            ),
            AppError::ExtractionFailure(detail) => {
                tracing::error!("Upload error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": EXTRACTION_FAILURE_MESSAGE }),
                )
            }
            AppError::ExtractionTimeout => {
                tracing::error!("Upload error: extraction timed out");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": EXTRACTION_TIMEOUT_MESSAGE }),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Upstream { message, details } => {
                tracing::error!("Error calling ML service: {message} ({details})");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": UPSTREAM_FAILURE_MESSAGE, "details": details }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
