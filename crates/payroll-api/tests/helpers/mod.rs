//! Test helpers: build AppState and router over a scripted extractor.
//!
//! Run from workspace root: `cargo test -p payroll-api`.

#![allow(dead_code)]

pub mod extractor;
pub mod uploads;

use axum::Router;
use axum_test::TestServer;
use payroll_api::services::FileApiLog;
use payroll_api::setup::routes;
use payroll_api::state::AppState;
use payroll_core::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub use extractor::{Script, ScriptedExtractor};

/// Test application: server plus the directories it writes into.
pub struct TestApp {
    pub server: TestServer,
    /// The router behind `server`, for driving requests by hand.
    pub router: Router,
    pub state: Arc<AppState>,
    pub extractor: Arc<ScriptedExtractor>,
    pub config: Config,
    pub _extractor_root: TempDir,
    pub _upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        self.config.upload_tmp_dir()
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.config.raw_dir()
    }

    /// Entries left behind in the upload temp directory.
    pub fn leftover_uploads(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.upload_dir())
            .expect("read upload dir")
            .map(|entry| entry.expect("dir entry").path())
            .collect()
    }

    pub fn api_log_lines(&self) -> Vec<String> {
        match std::fs::read_to_string(self.config.api_log_path()) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub fn setup_test_app(script: Script) -> TestApp {
    setup_test_app_with(script, |_| {})
}

/// An app whose extractor sleeps for `delay` before doing anything.
pub fn setup_slow_test_app(script: Script, delay: Duration) -> TestApp {
    build_test_app(ScriptedExtractor::new(script).with_delay(delay), |_| {})
}

/// Build an app whose configuration can be adjusted before the router is built.
pub fn setup_test_app_with<F>(script: Script, configure: F) -> TestApp
where
    F: FnOnce(&mut Config),
{
    build_test_app(ScriptedExtractor::new(script), configure)
}

fn build_test_app<F>(extractor: ScriptedExtractor, configure: F) -> TestApp
where
    F: FnOnce(&mut Config),
{
    let extractor_root = TempDir::new().expect("Failed to create extractor root");
    let upload_dir = TempDir::new().expect("Failed to create upload dir");

    let mut config = Config::with_extractor_root(extractor_root.path());
    config.upload_tmp_dir = upload_dir.path().to_path_buf();
    configure(&mut config);

    let extractor = Arc::new(extractor);
    let api_log = Arc::new(FileApiLog::new(config.api_log_path()));
    let state = Arc::new(AppState::new(config.clone(), extractor.clone(), api_log));

    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server =
        TestServer::new(app.clone().into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        router: app,
        state,
        extractor,
        config,
        _extractor_root: extractor_root,
        _upload_dir: upload_dir,
    }
}
