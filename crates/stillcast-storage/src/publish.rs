//! Artifact publication.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use stillcast_models::JobId;

use crate::client::StorageClient;
use crate::error::StorageResult;

impl StorageClient {
    /// Upload a produced video under a job-scoped key and mint a
    /// time-limited retrieval URL for it.
    pub async fn publish_video(
        &self,
        path: impl AsRef<Path>,
        job_id: &JobId,
        filename: &str,
        ttl: Duration,
    ) -> StorageResult<String> {
        let key = artifact_key(job_id, filename);
        self.upload_file(path, &key, content_type_for(filename)).await?;
        let url = self.presign_get(&key, ttl).await?;

        info!(
            job_id = %job_id,
            key = %key,
            ttl_secs = ttl.as_secs(),
            "Published artifact"
        );
        Ok(url)
    }
}

/// Storage key for a job's artifact.
///
/// The job id prefix keeps repeated submissions with identical filenames
/// from overwriting each other.
pub fn artifact_key(job_id: &JobId, filename: &str) -> String {
    format!("{}/{}", job_id, filename)
}

/// Content type from the artifact extension.
pub fn content_type_for(filename: &str) -> &'static str {
    if filename.ends_with(".mp4") {
        "video/mp4"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_filenames_get_distinct_keys() {
        let a = artifact_key(&JobId::new(), "video_output_cover.mp4");
        let b = artifact_key(&JobId::new(), "video_output_cover.mp4");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_layout() {
        let key = artifact_key(&JobId::from_string("job-1"), "out.mp4");
        assert_eq!(key, "job-1/out.mp4");
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("out.mp4"), "video/mp4");
        assert_eq!(content_type_for("out.bin"), "application/octet-stream");
    }
}
