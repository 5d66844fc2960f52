//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::services::FileApiLog;
use crate::state::AppState;
use anyhow::{Context, Result};
use payroll_core::Config;
use payroll_extractor::CommandExtractor;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tokio::fs::create_dir_all(config.upload_tmp_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp directory {}",
                config.upload_tmp_dir().display()
            )
        })?;

    let extractor = CommandExtractor::from_config(&config);
    if !extractor.root().is_dir() {
        tracing::warn!(
            root = %extractor.root().display(),
            "Extractor root does not exist; extraction requests will fail"
        );
    }

    tracing::info!(
        extractor_root = %config.extractor_root.display(),
        api_log = %config.api_log_path().display(),
        "Configuration loaded and validated successfully"
    );

    let api_log = Arc::new(FileApiLog::new(config.api_log_path()));
    let state = Arc::new(AppState::new(config.clone(), Arc::new(extractor), api_log));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
