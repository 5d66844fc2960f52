//! A scripted stand-in for the external payroll extractor.

use async_trait::async_trait;
use payroll_core::models::{ExtractionResult, SplitPayrolls};
use payroll_extractor::{ExtractorError, ExtractorResult, PayrollExtractor};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// What every extractor operation does when called.
#[derive(Clone, Debug)]
pub enum Script {
    /// Single: success payload. Split: payroll list. Sick leave: result list.
    Payload(Value),
    /// Single: a structured failure. Other operations treat it as an error.
    Failure(String),
    /// The extractor process failed.
    Error(String),
    Panic,
}

/// One observed extractor invocation.
#[derive(Clone, Debug)]
pub struct Call {
    pub path: PathBuf,
    /// Whether the temp upload existed while the extractor ran.
    pub existed: bool,
    pub bytes: Vec<u8>,
    pub outbox_dir: Option<PathBuf>,
}

pub struct ScriptedExtractor {
    script: Script,
    delay: Duration,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedExtractor {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before touching the file, like a slow PDF parse.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, path: &Path, outbox_dir: Option<&Path>) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let bytes = std::fs::read(path).ok();
        self.calls.lock().unwrap().push(Call {
            path: path.to_path_buf(),
            existed: bytes.is_some(),
            bytes: bytes.unwrap_or_default(),
            outbox_dir: outbox_dir.map(Path::to_path_buf),
        });
    }

    fn list(&self) -> ExtractorResult<Vec<Value>> {
        match &self.script {
            Script::Payload(Value::Array(items)) => Ok(items.clone()),
            Script::Payload(other) => Err(ExtractorError::InvalidOutput(format!(
                "expected a list, got {}",
                other
            ))),
            Script::Failure(message) | Script::Error(message) => Err(process_error(message)),
            Script::Panic => panic!("scripted extractor panic"),
        }
    }
}

fn process_error(message: &str) -> ExtractorError {
    ExtractorError::Process {
        status: "exit status: 1".to_string(),
        stderr: message.to_string(),
    }
}

#[async_trait]
impl PayrollExtractor for ScriptedExtractor {
    async fn extract_single_payroll(&self, pdf_path: &Path) -> ExtractorResult<ExtractionResult> {
        self.record(pdf_path, None).await;
        match &self.script {
            Script::Payload(payload) => Ok(ExtractionResult::Success(payload.clone())),
            Script::Failure(message) => Ok(ExtractionResult::Failure {
                message: message.clone(),
            }),
            Script::Error(message) => Err(process_error(message)),
            Script::Panic => panic!("scripted extractor panic"),
        }
    }

    async fn split_multi_payroll(&self, pdf_path: &Path) -> ExtractorResult<SplitPayrolls> {
        self.record(pdf_path, None).await;
        Ok(SplitPayrolls {
            pdf_path: pdf_path.display().to_string(),
            payrolls: self.list()?,
        })
    }

    async fn process_sick_leave_list(
        &self,
        csv_path: &Path,
        outbox_dir: &Path,
    ) -> ExtractorResult<Vec<Value>> {
        self.record(csv_path, Some(outbox_dir)).await;
        self.list()
    }
}
