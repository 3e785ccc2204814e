//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
///
/// Storage credentials live in `StorageConfig` and are validated when the
/// application state is built.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Root under which per-job workspaces are allocated
    pub scratch_root: PathBuf,
    /// Encoder time budget per job
    pub encode_timeout: Duration,
    /// Validity window for retrieval URLs
    pub url_ttl: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            scratch_root: std::env::temp_dir(),
            encode_timeout: Duration::from_secs(300),
            url_ttl: Duration::from_secs(900), // 15 minutes
            max_body_size: 100 * 1024 * 1024,  // 100MB
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            scratch_root: std::env::var("SCRATCH_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_root),
            encode_timeout: Duration::from_secs(
                std::env::var("ENCODE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.encode_timeout.as_secs()),
            ),
            url_ttl: Duration::from_secs(
                std::env::var("URL_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.url_ttl.as_secs()),
            ),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
