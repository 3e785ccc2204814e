//! S3-compatible client implementation.

use std::path::Path;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Configuration for the storage client.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Custom S3 API endpoint (MinIO, R2, GCS interop); None for AWS proper
    pub endpoint_url: Option<String>,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket name
    pub bucket_name: String,
    /// Region
    pub region: String,
}

impl StorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            endpoint_url: std::env::var("STORAGE_ENDPOINT_URL").ok(),
            access_key_id: std::env::var("STORAGE_ACCESS_KEY_ID")
                .map_err(|_| StorageError::config("STORAGE_ACCESS_KEY_ID not set"))?,
            secret_access_key: std::env::var("STORAGE_SECRET_ACCESS_KEY")
                .map_err(|_| StorageError::config("STORAGE_SECRET_ACCESS_KEY not set"))?,
            bucket_name: std::env::var("STORAGE_BUCKET")
                .map_err(|_| StorageError::config("STORAGE_BUCKET not set"))?,
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        })
    }
}

/// Object storage client.
#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    bucket: String,
}

impl StorageClient {
    /// Create a new client from configuration.
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "stillcast",
        );

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .force_path_style(true);

        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(builder.build());

        Ok(Self {
            client,
            bucket: config.bucket_name,
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        let config = StorageConfig::from_env()?;
        Self::new(config).await
    }

    /// The configured bucket.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload a local file.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        let path = path.as_ref();
        debug!("Uploading {} to {}", path.display(), key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| classify_sdk_error(e.to_string(), StorageError::UploadFailed))?;

        info!("Uploaded {} to {}", path.display(), key);
        Ok(())
    }

    /// Generate a presigned URL for GET, valid for `expires_in` and scoped
    /// to this one key.
    pub async fn presign_get(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| classify_sdk_error(e.to_string(), StorageError::PresignFailed))?;

        Ok(presigned.uri().to_string())
    }

    /// Check reachability and credentials with a head bucket call.
    ///
    /// Called once at startup (fail fast on misconfiguration) and by the
    /// readiness probe; bucket existence is never assumed per job.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::unavailable(format!("bucket check failed: {}", e)))?;
        Ok(())
    }
}

/// Classify an SDK failure: reachability and configuration problems become
/// `Unavailable`; anything else keeps the operation-specific kind.
fn classify_sdk_error(msg: String, fallback: fn(String) -> StorageError) -> StorageError {
    if is_unavailable(&msg) {
        StorageError::Unavailable(msg)
    } else {
        fallback(msg)
    }
}

fn is_unavailable(msg: &str) -> bool {
    const MARKERS: [&str; 7] = [
        "NoSuchBucket",
        "dispatch failure",
        "connection refused",
        "dns error",
        "timed out",
        "InvalidAccessKeyId",
        "SignatureDoesNotMatch",
    ];
    MARKERS.iter().any(|m| msg.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_classification() {
        assert!(matches!(
            classify_sdk_error("NoSuchBucket: stillcast".into(), StorageError::UploadFailed),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            classify_sdk_error("dispatch failure: io error".into(), StorageError::UploadFailed),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            classify_sdk_error("InvalidAccessKeyId".into(), StorageError::PresignFailed),
            StorageError::Unavailable(_)
        ));
    }

    #[test]
    fn test_other_errors_keep_operation_kind() {
        assert!(matches!(
            classify_sdk_error("EntityTooLarge".into(), StorageError::UploadFailed),
            StorageError::UploadFailed(_)
        ));
        assert!(matches!(
            classify_sdk_error("expiry out of range".into(), StorageError::PresignFailed),
            StorageError::PresignFailed(_)
        ));
    }
}
