//! Discovery and decoding of the engine's output artifact.
//!
//! The engine publishes `<results root>/<filename stem>/results.json` by
//! convention; nothing else about its output is validated here.

use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::errors::AppError;
use crate::storage::StorageLayout;

/// Load the result document for an uploaded filename and attach the
/// original filename under `image_path`.
///
/// An absent file means the engine ran but produced no usable output (or
/// used a different naming convention — filenames with multiple dots are
/// the usual culprit).
pub async fn load_results(layout: &StorageLayout, filename: &str) -> Result<Value, AppError> {
    let path = layout.result_path(filename);
    debug!(path = %path.display(), "loading OCR results");

    let raw = match fs::read(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::ResultNotFound { path });
        }
        Err(source) => {
            return Err(AppError::Staging {
                context: "failed to read results file",
                path,
                source,
            });
        }
    };

    let mut document: Value = serde_json::from_slice(&raw).map_err(|e| decode_error(&path, e.to_string()))?;

    match document.as_object_mut() {
        Some(object) => {
            object.insert("image_path".to_string(), Value::String(filename.to_string()));
        }
        None => {
            return Err(decode_error(&path, "result document is not a JSON object".to_string()));
        }
    }

    Ok(document)
}

fn decode_error(path: &Path, reason: String) -> AppError {
    AppError::ResultDecode {
        path: path.to_path_buf(),
        reason,
    }
}
