//! Application state.

use std::sync::Arc;

use tracing::info;

use stillcast_storage::StorageClient;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub storage: Arc<StorageClient>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Validates the storage target and the encoder binary up front so
    /// misconfiguration stops the process instead of failing per request.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let storage = StorageClient::from_env().await?;
        storage.check_connectivity().await?;
        info!(bucket = %storage.bucket(), "Storage target reachable");

        let ffmpeg = stillcast_media::check_ffmpeg()?;
        info!(path = %ffmpeg.display(), "Encoder binary resolved");

        Ok(Self {
            config,
            storage: Arc::new(storage),
        })
    }
}
