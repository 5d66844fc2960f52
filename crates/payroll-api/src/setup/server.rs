//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use payroll_core::Config;
use std::sync::Arc;
use std::time::Duration;

use crate::services::InFlightUploads;
use crate::state::AppState;

/// Longest time shutdown waits for running extractions.
const UPLOAD_DRAIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, state: Arc<AppState>, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port);
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        max_upload_mb = config.max_upload_size_bytes / 1024 / 1024,
        upload_tmp_dir = %config.upload_tmp_dir().display(),
        outbox = %config.outbox_dir().display(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.in_flight.clone()))
        .await?;

    drain_uploads(&state.in_flight).await;

    Ok(())
}

/// Let detached upload tasks finish so their temp files are removed and their
/// outcomes reach the API log.
async fn drain_uploads(in_flight: &InFlightUploads) {
    let running = in_flight.count();
    if running == 0 {
        return;
    }

    tracing::info!(running, "Waiting for in-flight extractions to finish");
    match tokio::time::timeout(UPLOAD_DRAIN_TIMEOUT, in_flight.wait_idle()).await {
        Ok(()) => tracing::info!("All extractions finished"),
        Err(_) => tracing::warn!(
            still_running = in_flight.count(),
            timeout_secs = UPLOAD_DRAIN_TIMEOUT.as_secs(),
            "Gave up waiting for extractions"
        ),
    }
}

/// Resolves on Ctrl+C (SIGINT) or SIGTERM.
///
/// # Panics
/// Panics if a signal handler cannot be installed.
async fn shutdown_signal(in_flight: Arc<InFlightUploads>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    tracing::info!(
        signal,
        in_flight_uploads = in_flight.count(),
        "Stopping new connections"
    );
}
