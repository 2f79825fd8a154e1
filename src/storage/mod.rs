//! Filesystem layout shared by every request: upload staging, the OCR
//! result tree, and the display-image store.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;

/// Returns the storage key used for a client-supplied filename.
///
/// The filename is used verbatim: no normalization, no extension whitelist,
/// no traversal rejection. Every path composition below goes through this
/// single function, so the policy can be hardened in one place.
pub fn storage_key(filename: &str) -> &str {
    filename
}

/// Filename minus its final extension. `scan.page1.png` keeps its inner
/// dots (`scan.page1`), and a dotless filename is returned unchanged —
/// the same split the OCR engine applies when naming its output directory.
pub fn filename_stem(filename: &str) -> &str {
    match Path::new(filename).extension() {
        Some(ext) => &filename[..filename.len() - ext.len() - 1],
        None => filename,
    }
}

/// Owns the three storage roots and all path composition over them.
///
/// Created once at startup; requests only compose paths and touch files
/// under the roots. No locking: concurrent requests sharing a filename
/// race, last writer wins.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    upload_root: PathBuf,
    results_root: PathBuf,
    images_root: PathBuf,
}

impl StorageLayout {
    pub fn new(config: &Config) -> Self {
        Self {
            upload_root: PathBuf::from(&config.upload_path),
            results_root: PathBuf::from(&config.results_path),
            images_root: PathBuf::from(&config.images_path),
        }
    }

    /// Create the three roots (and any missing ancestors). Idempotent
    /// across repeated startups.
    pub async fn initialize(&self) -> Result<()> {
        for root in [&self.upload_root, &self.results_root, &self.images_root] {
            fs::create_dir_all(root).await?;
        }
        info!(
            upload = %self.upload_root.display(),
            results = %self.results_root.display(),
            images = %self.images_root.display(),
            "storage layout initialized"
        );
        Ok(())
    }

    /// Where an upload is staged for the duration of one request.
    pub fn staging_path(&self, filename: &str) -> PathBuf {
        self.upload_root.join(storage_key(filename))
    }

    /// Where the retained display copy lives, keyed by original filename.
    pub fn display_path(&self, filename: &str) -> PathBuf {
        self.images_root.join(storage_key(filename))
    }

    /// Where the OCR engine is expected to publish its output for the
    /// given input filename.
    pub fn result_path(&self, filename: &str) -> PathBuf {
        self.results_root
            .join(filename_stem(storage_key(filename)))
            .join("results.json")
    }

    /// Write the uploaded payload to the staging path.
    pub async fn stage_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.staging_path(filename);
        fs::write(&path, data).await.map_err(|source| AppError::Staging {
            context: "failed to write staged upload",
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Duplicate the staged upload into the display store. The copy is
    /// never deleted by the pipeline; a later upload with the same
    /// filename overwrites it.
    pub async fn copy_to_display(&self, filename: &str) -> Result<PathBuf, AppError> {
        let staged = self.staging_path(filename);
        let display = self.display_path(filename);
        fs::copy(&staged, &display)
            .await
            .map_err(|source| AppError::Staging {
                context: "failed to copy upload into display store",
                path: display.clone(),
                source,
            })?;
        Ok(display)
    }

    /// Delete the staged upload. A file that was never created (or was
    /// already removed) is not an error.
    pub async fn remove_staged(&self, filename: &str) -> Result<(), AppError> {
        let path = self.staging_path(filename);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(AppError::Staging {
                context: "failed to remove staged upload",
                path,
                source,
            }),
        }
    }

    /// Best-effort variant of [`StorageLayout::remove_staged`] used on
    /// failure paths, where the original error must win.
    pub async fn discard_staged(&self, filename: &str) {
        if let Err(e) = self.remove_staged(filename).await {
            warn!("cleanup of staged upload failed: {}", e);
        }
    }

    /// Raw bytes of the display copy for the given filename.
    pub async fn read_display(&self, filename: &str) -> std::io::Result<Vec<u8>> {
        fs::read(self.display_path(filename)).await
    }
}
