use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

use crate::ocr::error::OcrError;

/// Everything that can go wrong while handling a document request.
///
/// The wire contract is coarse (400 for client input errors, 500 for the
/// rest, body always `{"error": "<message>"}`), but internal callers get
/// discriminated variants.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file provided")]
    MissingFilePart,

    #[error("No file selected")]
    EmptyFilename,

    #[error("invalid multipart request: {0}")]
    Multipart(#[from] MultipartError),

    #[error("{context} at {}: {source}", .path.display())]
    Staging {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] OcrError),

    #[error("results file not found at {}", .path.display())]
    ResultNotFound { path: PathBuf },

    #[error("failed to decode results file at {}: {reason}", .path.display())]
    ResultDecode { path: PathBuf, reason: String },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFilePart | AppError::EmptyFilename | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Staging { .. }
            | AppError::Engine(_)
            | AppError::ResultNotFound { .. }
            | AppError::ResultDecode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("request failed: {}", message);
        }

        // The underlying message is surfaced verbatim to the client.
        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
