use anyhow::Result;

/// Runtime configuration, loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// Staging directory for uploads; files live here only for the duration
    /// of one request.
    pub upload_path: String,
    /// Root of the result tree the OCR engine publishes into, one
    /// subdirectory per processed filename stem.
    pub results_path: String,
    /// Display-image store, flat, keyed by original filename.
    pub images_path: String,
    /// Executable invoked for OCR.
    pub ocr_command: String,
    /// Language hint passed to the engine. Fixed per process; there is no
    /// per-request language selection.
    pub ocr_language: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Config {
            server_address: std::env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            upload_path: std::env::var("UPLOAD_PATH").unwrap_or_else(|_| "uploads".to_string()),
            results_path: std::env::var("RESULTS_PATH")
                .unwrap_or_else(|_| "results/surya".to_string()),
            images_path: std::env::var("IMAGES_PATH")
                .unwrap_or_else(|_| "static/images".to_string()),
            ocr_command: std::env::var("OCR_COMMAND")
                .unwrap_or_else(|_| "surya_ocr".to_string()),
            ocr_language: std::env::var("OCR_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.ocr_command.trim().is_empty() {
            anyhow::bail!("OCR_COMMAND must not be empty");
        }
        if self.ocr_language.trim().is_empty() {
            anyhow::bail!("OCR_LANGUAGE must not be empty");
        }
        for (name, value) in [
            ("UPLOAD_PATH", &self.upload_path),
            ("RESULTS_PATH", &self.results_path),
            ("IMAGES_PATH", &self.images_path),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", name);
            }
        }
        Ok(())
    }
}
