//! Per-request temporary upload files

use payroll_core::AppError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// An uploaded file persisted under a unique temporary name.
///
/// The file is removed by [`TempUpload::cleanup`]; if the value is dropped
/// without cleanup (for example while unwinding) the drop removes it instead.
#[derive(Debug)]
pub struct TempUpload {
    path: TempPath,
}

impl TempUpload {
    /// Write `data` to a fresh `payroll-upload-*<suffix>` file in `dir`.
    pub async fn persist(dir: PathBuf, suffix: &'static str, data: Vec<u8>) -> Result<Self, AppError> {
        tokio::task::spawn_blocking(move || -> Result<Self, AppError> {
            std::fs::create_dir_all(&dir)?;
            let mut file = tempfile::Builder::new()
                .prefix("payroll-upload-")
                .suffix(suffix)
                .tempfile_in(&dir)?;
            file.write_all(&data)?;
            file.flush()?;
            Ok(Self {
                path: file.into_temp_path(),
            })
        })
        .await
        .map_err(|e| AppError::Internal(format!("Temp file task failed: {}", e)))?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file. Failures are logged and never reach the caller.
    pub fn cleanup(self) {
        let path = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Cleaned up temporary file");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Temporary file already gone");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove temporary file"
                );
            }
        }
    }
}
