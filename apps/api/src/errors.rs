use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why an upload request carried no usable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingFile {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"error": "<message>"}`. Extraction and
/// generation failures pass the underlying message through to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    MissingFile(#[from] MissingFile),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Extraction(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    GenerationService(String),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The allow-list rejection raised by the upload validator.
    pub fn invalid_file_type() -> Self {
        AppError::UnsupportedFormat("Invalid file type".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFile(_) | AppError::UnsupportedFormat(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Multipart(e) => e.status(),
            AppError::Json(e) => e.status(),
            AppError::Extraction(_) | AppError::GenerationService(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Extraction(msg) => {
                tracing::error!("Extraction error: {msg}");
                msg.clone()
            }
            AppError::GenerationService(msg) => {
                tracing::error!("Generation service error: {msg}");
                msg.clone()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::Multipart(e) => e.body_text(),
            AppError::Json(e) => e.body_text(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
