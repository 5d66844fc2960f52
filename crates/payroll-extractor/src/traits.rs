//! Extractor capability trait

use async_trait::async_trait;
use payroll_core::models::{ExtractionResult, SplitPayrolls};
use serde_json::Value;
use std::path::Path;

use crate::ExtractorResult;

/// The three operations the external extractor offers.
///
/// Every call is synchronous from the gateway's point of view: it runs to
/// completion and is attempted exactly once. An `Err` means the extractor could
/// not produce an answer at all; a document the extractor understood but could
/// not extract is an `Ok(ExtractionResult::Failure { .. })`.
#[async_trait]
pub trait PayrollExtractor: Send + Sync {
    /// Extract one payslip from a PDF.
    async fn extract_single_payroll(&self, pdf_path: &Path) -> ExtractorResult<ExtractionResult>;

    /// Split a multi-employee PDF into ordered per-employee payroll records.
    async fn split_multi_payroll(&self, pdf_path: &Path) -> ExtractorResult<SplitPayrolls>;

    /// Correlate a sick-leave CSV against the latest batch artifact under `outbox_dir`.
    async fn process_sick_leave_list(
        &self,
        csv_path: &Path,
        outbox_dir: &Path,
    ) -> ExtractorResult<Vec<Value>>;
}
