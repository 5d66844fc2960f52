use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_FAILURE_MESSAGE: &str = "Unknown extraction error";

/// Outcome of a single-payslip extraction.
///
/// The extractor reports failures in-band as an object carrying
/// `"status": "error"`; [`ExtractionResult::from_raw`] turns that convention
/// into a tag so callers never probe keys themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Success(Value),
    Failure { message: String },
}

impl ExtractionResult {
    pub fn from_raw(value: Value) -> Self {
        let is_failure = value
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|status| status == "error");

        if !is_failure {
            return ExtractionResult::Success(value);
        }

        let message = value
            .get("error_message")
            .and_then(|m| match m {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());

        ExtractionResult::Failure { message }
    }
}

/// Result of splitting a multi-employee PDF into per-employee payroll blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPayrolls {
    pub pdf_path: String,
    pub payrolls: Vec<Value>,
}

/// The monthly handoff file read later by the sick-leave extractor.
///
/// Serialized as `{"pdf_path": ..., "payrolls": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPayrollBatch {
    pub pdf_path: String,
    pub payrolls: Vec<Value>,
}

impl RawPayrollBatch {
    pub fn employee_count(&self) -> usize {
        self.payrolls.len()
    }
}

impl From<SplitPayrolls> for RawPayrollBatch {
    fn from(split: SplitPayrolls) -> Self {
        RawPayrollBatch {
            pdf_path: split.pdf_path,
            payrolls: split.payrolls,
        }
    }
}
