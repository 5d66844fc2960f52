//! Monthly batch artifact storage
//!
//! A multi-employee upload leaves its split payrolls at
//! `outbox/raw/<YYYY_MM>/payroll_raw.json`, where the sick-leave extractor
//! later picks them up. There is one file per month and the last upload wins:
//! concurrent writers are not merged, but each write replaces the file
//! atomically so readers only ever see a complete document.

use chrono::{DateTime, Local};
use payroll_core::models::RawPayrollBatch;
use payroll_core::AppError;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const BATCH_FILE_NAME: &str = "payroll_raw.json";

#[derive(Debug, Clone)]
pub struct BatchArtifactStore {
    raw_dir: PathBuf,
}

impl BatchArtifactStore {
    pub fn new(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
        }
    }

    /// `YYYY_MM` bucket for the given wall-clock time.
    pub fn month_bucket(now: DateTime<Local>) -> String {
        now.format("%Y_%m").to_string()
    }

    pub fn path_for(&self, now: DateTime<Local>) -> PathBuf {
        self.raw_dir
            .join(Self::month_bucket(now))
            .join(BATCH_FILE_NAME)
    }

    /// Write the batch for the month containing `now`, replacing any earlier one.
    pub async fn write(
        &self,
        batch: &RawPayrollBatch,
        now: DateTime<Local>,
    ) -> Result<PathBuf, AppError> {
        let path = self.path_for(now);
        let json = serde_json::to_vec_pretty(batch)?;

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_replacing(&target, &json))
            .await
            .map_err(|e| AppError::Internal(format!("Batch write task failed: {}", e)))??;

        tracing::info!(
            path = %path.display(),
            employees = batch.employee_count(),
            "Wrote payroll batch artifact"
        );
        Ok(path)
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_replacing(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    let dir = path
        .parent()
        .ok_or_else(|| AppError::Internal(format!("Invalid batch path: {}", path.display())))?;
    std::fs::create_dir_all(dir)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".payroll_raw-")
        .suffix(".json.tmp")
        .tempfile_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| AppError::from(e.error))?;
    Ok(())
}
