//! Payroll Gateway API Library
//!
//! HTTP handlers, the per-request upload lifecycle, and application setup.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
