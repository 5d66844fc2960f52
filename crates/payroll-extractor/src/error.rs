use payroll_core::AppError;
use thiserror::Error;

/// Extractor bridge errors
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Failed to start extractor '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Extractor exited with {status}: {stderr}")]
    Process { status: String, stderr: String },

    #[error("Extractor returned invalid output: {0}")]
    InvalidOutput(String),
}

/// Result type for extractor operations
pub type ExtractorResult<T> = Result<T, ExtractorError>;

impl From<ExtractorError> for AppError {
    fn from(err: ExtractorError) -> Self {
        AppError::Extractor(err.to_string())
    }
}
