//! Append-only API request log
//!
//! One line per terminal request outcome in `outbox/api_log.txt`. Writing the
//! log never affects the response: failures are reported through tracing and
//! otherwise ignored.

use async_trait::async_trait;
use payroll_core::models::LogEntry;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Sink for request outcome records.
#[async_trait]
pub trait ApiLog: Send + Sync {
    async fn append(&self, entry: &LogEntry);
}

/// Appends log lines to a text file, creating its directory on demand.
#[derive(Debug, Clone)]
pub struct FileApiLog {
    path: PathBuf,
    // Serializes writers in this process so each line lands in one piece.
    write_lock: Arc<Mutex<()>>,
}

impl FileApiLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_blocking(path: &Path, lock: &Mutex<()>, line: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())
    }
}

#[async_trait]
impl ApiLog for FileApiLog {
    async fn append(&self, entry: &LogEntry) {
        let path = self.path.clone();
        let lock = self.write_lock.clone();
        let line = entry.to_line();

        let result = tokio::task::spawn_blocking(move || {
            Self::append_blocking(&path, &lock, &line)
        })
        .await
        .map_err(std::io::Error::other)
        .and_then(|r| r);

        if let Err(e) = result {
            tracing::warn!(
                error = %e,
                path = %self.path.display(),
                "Failed to write to API log"
            );
        }
    }
}
