//! Application state shared by all handlers.

use payroll_core::Config;
use payroll_extractor::PayrollExtractor;
use std::sync::Arc;

use crate::services::{ApiLog, BatchArtifactStore, InFlightUploads};

pub struct AppState {
    pub config: Config,
    pub extractor: Arc<dyn PayrollExtractor>,
    pub api_log: Arc<dyn ApiLog>,
    pub batches: BatchArtifactStore,
    /// Uploads still being processed, awaited at shutdown.
    pub in_flight: Arc<InFlightUploads>,
}

impl AppState {
    pub fn new(
        config: Config,
        extractor: Arc<dyn PayrollExtractor>,
        api_log: Arc<dyn ApiLog>,
    ) -> Self {
        let batches = BatchArtifactStore::new(config.raw_dir());
        Self {
            config,
            extractor,
            api_log,
            batches,
            in_flight: Arc::new(InFlightUploads::new()),
        }
    }
}
