//! Data models for the gateway
//!
//! Uploads and their per-endpoint rules, the tagged extraction result, the
//! monthly batch artifact, and the append-only API log entry.

mod api_log;
mod extraction;
mod upload;

// Re-export all models for convenient imports
pub use api_log::*;
pub use extraction::*;
pub use upload::*;
