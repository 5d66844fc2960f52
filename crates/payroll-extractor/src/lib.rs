//! Bridge to the external payroll-extractor package.
//!
//! The gateway never parses PDFs or CSVs itself. It talks to the extractor
//! through the [`PayrollExtractor`] trait; [`CommandExtractor`] is the
//! production implementation, running the Python package in a subprocess.

mod command;
mod error;
mod traits;

pub use command::CommandExtractor;
pub use error::{ExtractorError, ExtractorResult};
pub use traits::PayrollExtractor;
