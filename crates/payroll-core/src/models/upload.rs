use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppError;

/// A file received over HTTP, held in memory until it is written to a temp path.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The two upload endpoints and the rules each one enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Payroll,
    SickLeaveList,
}

impl UploadKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            UploadKind::Payroll => "/extract/payroll",
            UploadKind::SickLeaveList => "/extract/sjuklista",
        }
    }

    /// Required filename extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            UploadKind::Payroll => ".pdf",
            UploadKind::SickLeaveList => ".csv",
        }
    }

    /// Filename assumed when the multipart part carries none.
    pub fn fallback_filename(&self) -> &'static str {
        match self {
            UploadKind::Payroll => "unknown.pdf",
            UploadKind::SickLeaveList => "unknown.csv",
        }
    }

    fn wrong_type_message(&self) -> &'static str {
        match self {
            UploadKind::Payroll => "File must be a PDF",
            UploadKind::SickLeaveList => "File must be a CSV",
        }
    }

    fn empty_message(&self) -> &'static str {
        match self {
            UploadKind::Payroll => "Empty file uploaded",
            UploadKind::SickLeaveList => "Empty CSV uploaded",
        }
    }

    /// Reject files with the wrong extension (case-insensitive) or no content.
    /// The extension is checked first.
    pub fn validate(&self, file: &UploadedFile) -> Result<(), AppError> {
        if !file.filename.to_lowercase().ends_with(self.extension()) {
            return Err(AppError::InvalidInput(self.wrong_type_message().to_string()));
        }
        if file.is_empty() {
            return Err(AppError::InvalidInput(self.empty_message().to_string()));
        }
        Ok(())
    }
}

/// How a payroll PDF is processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    /// One payslip, extracted directly.
    #[default]
    Single,
    /// A multi-employee PDF, split into the monthly batch artifact.
    Multi,
}

impl UploadMode {
    /// Only the exact value `multi` selects multi mode; anything else is single.
    pub fn from_form_value(value: &str) -> Self {
        if value == "multi" {
            UploadMode::Multi
        } else {
            UploadMode::Single
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadMode::Single => "single",
            UploadMode::Multi => "multi",
        }
    }
}
