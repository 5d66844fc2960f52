//! Configuration module
//!
//! Gateway settings are read from the environment (a `.env` file is honoured)
//! and validated once at startup.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 50;
const DEFAULT_EXTRACTOR_ROOT: &str = "../payroll-extractor";
const DEFAULT_EXTRACTOR_PYTHON: &str = "python3";
const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Local development front-ends allowed by default.
pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:3001",
    "http://127.0.0.1:3001",
];

const OUTBOX_DIR: &str = "outbox";
const RAW_DIR: &str = "raw";
const API_LOG_FILE: &str = "api_log.txt";

/// Gateway configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Root of the external payroll-extractor package; `outbox/` lives beneath it.
    pub extractor_root: PathBuf,
    pub extractor_python: String,
    pub upload_tmp_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    /// Upper bound on requests in flight; excess requests wait.
    pub http_concurrency_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = match var("CORS_ORIGINS") {
            Some(origins) => origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let max_upload_size_mb = var("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port,
            environment,
            cors_origins,
            extractor_root: var("EXTRACTOR_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXTRACTOR_ROOT)),
            extractor_python: var("EXTRACTOR_PYTHON")
                .unwrap_or_else(|| DEFAULT_EXTRACTOR_PYTHON.to_string()),
            upload_tmp_dir: var("UPLOAD_TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            http_concurrency_limit: var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        config.validate()?;
        Ok(config)
    }

    /// Defaults rooted at the given extractor directory. Used by tests and tools.
    pub fn with_extractor_root(extractor_root: impl Into<PathBuf>) -> Self {
        Config {
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            extractor_root: extractor_root.into(),
            extractor_python: DEFAULT_EXTRACTOR_PYTHON.to_string(),
            upload_tmp_dir: env::temp_dir(),
            max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            http_concurrency_limit: DEFAULT_HTTP_CONCURRENCY_LIMIT,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        // Credentialed CORS cannot be combined with a wildcard origin.
        if self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot contain '*' because credentials are allowed. Please specify explicit origins."
            ));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.extractor_python.trim().is_empty() {
            return Err(anyhow::anyhow!("EXTRACTOR_PYTHON must not be empty"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn outbox_dir(&self) -> PathBuf {
        self.extractor_root.join(OUTBOX_DIR)
    }

    pub fn api_log_path(&self) -> PathBuf {
        self.outbox_dir().join(API_LOG_FILE)
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.outbox_dir().join(RAW_DIR)
    }

    pub fn upload_tmp_dir(&self) -> &Path {
        &self.upload_tmp_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_local_development_setup() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.cors_origins.len(), 4);
        assert!(config.cors_origins.contains(&"http://127.0.0.1:3001".to_string()));
        assert_eq!(config.max_upload_size_bytes, 50 * 1024 * 1024);
        assert!(!config.is_production());
        assert_eq!(config.http_concurrency_limit, 10_000);
    }

    #[test]
    fn concurrency_limit_is_at_least_one() {
        let config = config_from(&[("HTTP_CONCURRENCY_LIMIT", "0")]).unwrap();
        assert_eq!(config.http_concurrency_limit, 1);
    }

    #[test]
    fn derived_paths_live_under_outbox() {
        let config = config_from(&[("EXTRACTOR_ROOT", "/srv/payroll-extractor")]).unwrap();
        assert_eq!(
            config.api_log_path(),
            PathBuf::from("/srv/payroll-extractor/outbox/api_log.txt")
        );
        assert_eq!(
            config.raw_dir(),
            PathBuf::from("/srv/payroll-extractor/outbox/raw")
        );
    }

    #[test]
    fn wildcard_cors_is_rejected() {
        let err = config_from(&[("CORS_ORIGINS", "*")]).unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn app_env_is_a_fallback_for_environment() {
        let config = config_from(&[("APP_ENV", "prod")]).unwrap();
        assert!(config.is_production());
    }
}
