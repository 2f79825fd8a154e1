//! External OCR engine invocation.
//!
//! The engine is a black box: it takes a file path and a language hint,
//! and publishes its output into the result tree on its own. Success is
//! defined purely by a zero exit status.

pub mod error;
pub mod results;

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::ocr::error::OcrError;

/// Capability seam for the OCR engine, so tests (and a future timeout
/// wrapper) can substitute the subprocess call.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Run the engine against a staged file. Blocks the current request
    /// until the engine terminates; there is no timeout and no retry.
    async fn run(&self, input: &Path, lang: &str) -> Result<(), OcrError>;
}

/// Invokes the `surya_ocr` executable (or whatever `OCR_COMMAND` names) as
/// `<command> <input-path> --langs <lang>`.
pub struct SuryaOcr {
    command: String,
}

impl SuryaOcr {
    pub fn new(command: String) -> Self {
        Self { command }
    }
}

#[async_trait]
impl OcrEngine for SuryaOcr {
    async fn run(&self, input: &Path, lang: &str) -> Result<(), OcrError> {
        debug!(command = %self.command, input = %input.display(), lang, "invoking OCR engine");

        // Stdout/stderr are inherited, not captured; the exit status is the
        // only signal inspected.
        let status = Command::new(&self.command)
            .arg(input)
            .arg("--langs")
            .arg(lang)
            .status()
            .await
            .map_err(|source| OcrError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(OcrError::Exit {
                command: self.command.clone(),
                status,
            });
        }

        info!(input = %input.display(), "OCR engine finished");
        Ok(())
    }
}
