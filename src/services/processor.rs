//! End-to-end document processing pipeline.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::errors::AppError;
use crate::ocr::{results, OcrEngine};
use crate::storage::StorageLayout;

/// Orchestrates one upload from staging through OCR to the enriched
/// result document.
///
/// Holds no cross-request state; the only hazard is two concurrent
/// requests sharing a filename, which race on the shared storage roots.
#[derive(Clone)]
pub struct DocumentProcessor {
    storage: Arc<StorageLayout>,
    engine: Arc<dyn OcrEngine>,
    language: String,
}

impl DocumentProcessor {
    pub fn new(storage: Arc<StorageLayout>, engine: Arc<dyn OcrEngine>, language: String) -> Self {
        Self {
            storage,
            engine,
            language,
        }
    }

    /// Stage → duplicate → invoke → locate/parse → cleanup → respond.
    ///
    /// Any failure after staging removes the staged file best-effort and
    /// surfaces the underlying error; no partial results are returned.
    pub async fn process(&self, filename: &str, data: &[u8]) -> Result<Value, AppError> {
        info!(filename, size = data.len(), "processing document");

        let result = self.run_pipeline(filename, data).await;

        if result.is_err() {
            self.storage.discard_staged(filename).await;
        }

        result
    }

    async fn run_pipeline(&self, filename: &str, data: &[u8]) -> Result<Value, AppError> {
        let staged = self.storage.stage_upload(filename, data).await?;
        self.storage.copy_to_display(filename).await?;

        self.engine.run(&staged, &self.language).await?;

        let document = results::load_results(&self.storage, filename).await?;

        // The staged upload is ephemeral; a failure to remove it fails the
        // request even though OCR already succeeded.
        self.storage.remove_staged(filename).await?;

        info!(filename, "document processed");
        Ok(document)
    }
}

impl std::fmt::Debug for DocumentProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentProcessor")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
