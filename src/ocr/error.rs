use std::process::ExitStatus;
use thiserror::Error;

/// Failures of the external OCR engine invocation. Both variants are fatal
/// for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to launch OCR engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR engine `{command}` exited with {status}")]
    Exit { command: String, status: ExitStatus },
}
