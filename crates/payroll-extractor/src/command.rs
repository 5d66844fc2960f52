//! Subprocess-backed extractor
//!
//! Each operation runs `<python> -c <bridge> <args...>` inside the extractor
//! root. The bridge imports the matching extractor function, sends anything the
//! extractor prints to stderr, and writes the return value to stdout as JSON.

use async_trait::async_trait;
use payroll_core::models::{ExtractionResult, SplitPayrolls};
use payroll_core::Config;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::{ExtractorError, ExtractorResult, PayrollExtractor};

const SINGLE_PAYROLL_BRIDGE: &str = r#"
import contextlib, json, sys
from extractor.extract_payroll import extract_payroll
with contextlib.redirect_stdout(sys.stderr):
    result = extract_payroll(sys.argv[1])
json.dump(result, sys.stdout, ensure_ascii=False, default=str)
"#;

const SPLIT_PAYROLLS_BRIDGE: &str = r#"
import contextlib, json, sys
from extractor.extract_payroll_prepare import split_payrolls_in_pdf
with contextlib.redirect_stdout(sys.stderr):
    result = split_payrolls_in_pdf(sys.argv[1])
json.dump({"pdf_path": result["pdf_path"], "payrolls": result["payrolls"]}, sys.stdout, ensure_ascii=False, default=str)
"#;

const SICK_LEAVE_BRIDGE: &str = r#"
import contextlib, json, sys
from extractor.extract_payroll_from_list import process_sjuklista
with contextlib.redirect_stdout(sys.stderr):
    result = process_sjuklista(sys.argv[1], outbox_dir=sys.argv[2])
json.dump(result, sys.stdout, ensure_ascii=False, default=str)
"#;

/// Longest stderr excerpt carried into an error message.
const STDERR_EXCERPT_LEN: usize = 2000;

/// Runs the Python payroll-extractor package in a child process per call.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    python: String,
    root: PathBuf,
}

impl CommandExtractor {
    pub fn new(python: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            root: root.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.extractor_python.clone(), config.extractor_root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `PYTHONPATH` with the extractor root in front of any inherited entries.
    fn python_path(&self) -> OsString {
        let mut paths = vec![self.root.clone()];
        if let Some(existing) = std::env::var_os("PYTHONPATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(paths).unwrap_or_else(|_| self.root.clone().into_os_string())
    }

    async fn run_bridge(&self, bridge: &str, args: &[&Path]) -> ExtractorResult<Value> {
        tracing::debug!(
            program = %self.python,
            root = %self.root.display(),
            args = ?args,
            "Running extractor"
        );

        let output = Command::new(&self.python)
            .arg("-c")
            .arg(bridge)
            .args(args)
            .current_dir(&self.root)
            .env("PYTHONPATH", self.python_path())
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ExtractorError::Spawn {
                program: self.python.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractorError::Process {
                status: output.status.to_string(),
                stderr: stderr_excerpt(&output.stderr),
            });
        }

        if !output.stderr.is_empty() {
            tracing::debug!(
                stderr = %stderr_excerpt(&output.stderr),
                "Extractor diagnostics"
            );
        }

        parse_stdout(&output.stdout)
    }
}

fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    // Keep the tail: Python puts the exception itself on the last lines.
    match trimmed.char_indices().rev().nth(STDERR_EXCERPT_LEN) {
        Some((idx, _)) => trimmed[idx..].to_string(),
        None => trimmed.to_string(),
    }
}

fn parse_stdout(stdout: &[u8]) -> ExtractorResult<Value> {
    serde_json::from_slice(stdout).map_err(|e| {
        let text = String::from_utf8_lossy(stdout);
        let preview: String = text.trim().chars().take(200).collect();
        ExtractorError::InvalidOutput(format!("{} (output: {:?})", e, preview))
    })
}

#[async_trait]
impl PayrollExtractor for CommandExtractor {
    async fn extract_single_payroll(&self, pdf_path: &Path) -> ExtractorResult<ExtractionResult> {
        let raw = self.run_bridge(SINGLE_PAYROLL_BRIDGE, &[pdf_path]).await?;
        Ok(ExtractionResult::from_raw(raw))
    }

    async fn split_multi_payroll(&self, pdf_path: &Path) -> ExtractorResult<SplitPayrolls> {
        let raw = self.run_bridge(SPLIT_PAYROLLS_BRIDGE, &[pdf_path]).await?;
        serde_json::from_value(raw)
            .map_err(|e| ExtractorError::InvalidOutput(format!("split result: {}", e)))
    }

    async fn process_sick_leave_list(
        &self,
        csv_path: &Path,
        outbox_dir: &Path,
    ) -> ExtractorResult<Vec<Value>> {
        let raw = self
            .run_bridge(SICK_LEAVE_BRIDGE, &[csv_path, outbox_dir])
            .await?;
        match raw {
            Value::Array(results) => Ok(results),
            other => Err(ExtractorError::InvalidOutput(format!(
                "expected a list of results, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
