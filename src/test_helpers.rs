/*!
 * Test Helpers and Utilities
 *
 * Utilities for building isolated test configurations, mock OCR engines,
 * and a fully assembled application router over a temporary storage root.
 */

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use serde_json::Value;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;

use crate::config::Config;
use crate::ocr::error::OcrError;
use crate::ocr::OcrEngine;
use crate::services::processor::DocumentProcessor;
use crate::storage::{filename_stem, StorageLayout};
use crate::{app, AppState};

/// Creates a test configuration with every storage root under the given
/// directory, so tests never touch the process-wide layout.
pub fn create_test_config(root: &Path) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        upload_path: root.join("uploads").to_string_lossy().to_string(),
        results_path: root.join("results/surya").to_string_lossy().to_string(),
        images_path: root.join("static/images").to_string_lossy().to_string(),
        ocr_command: "surya_ocr".to_string(),
        ocr_language: "en".to_string(),
    }
}

/// Mock engine that behaves like a healthy OCR run: it publishes a fixed
/// document at the conventional result path for its input.
pub struct WritingOcrEngine {
    results_root: PathBuf,
    document: Value,
}

impl WritingOcrEngine {
    pub fn new(config: &Config, document: Value) -> Self {
        Self {
            results_root: PathBuf::from(&config.results_path),
            document,
        }
    }
}

#[async_trait]
impl OcrEngine for WritingOcrEngine {
    async fn run(&self, input: &Path, _lang: &str) -> Result<(), OcrError> {
        let filename = input
            .file_name()
            .and_then(|name| name.to_str())
            .expect("staged path has a utf-8 filename");
        let dir = self.results_root.join(filename_stem(filename));
        tokio::fs::create_dir_all(&dir)
            .await
            .expect("create result directory");
        tokio::fs::write(dir.join("results.json"), self.document.to_string())
            .await
            .expect("write results.json");
        Ok(())
    }
}

/// Mock engine that exits non-zero without producing output.
pub struct FailingOcrEngine;

#[async_trait]
impl OcrEngine for FailingOcrEngine {
    async fn run(&self, _input: &Path, _lang: &str) -> Result<(), OcrError> {
        Err(OcrError::Exit {
            command: "mock-ocr".to_string(),
            status: ExitStatus::from_raw(256),
        })
    }
}

/// Mock engine that succeeds but never publishes a result file.
pub struct SilentOcrEngine;

#[async_trait]
impl OcrEngine for SilentOcrEngine {
    async fn run(&self, _input: &Path, _lang: &str) -> Result<(), OcrError> {
        Ok(())
    }
}

/// Assemble the application over an initialized storage layout and the
/// given engine.
pub async fn test_app(config: &Config, engine: Arc<dyn OcrEngine>) -> Router {
    let storage = Arc::new(StorageLayout::new(config));
    storage.initialize().await.expect("initialize storage layout");
    let processor =
        DocumentProcessor::new(storage.clone(), engine, config.ocr_language.clone());
    app(Arc::new(AppState {
        config: config.clone(),
        storage,
        processor,
    }))
}

/// Build a multipart POST request with a single part. `filename: None`
/// produces a bare form field, which does not count as a file part.
pub fn multipart_upload_request(
    uri: &str,
    field: &str,
    filename: Option<&str>,
    payload: &[u8],
) -> Request<Body> {
    let boundary = "suryad-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n")
                .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"\r\n").as_bytes(),
        ),
    }
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("build multipart request")
}
