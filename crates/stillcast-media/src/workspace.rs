//! Per-job scratch workspaces.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use stillcast_models::JobId;

use crate::error::MediaResult;

/// Exclusive scratch directory for one job.
///
/// Created on allocation and removed exactly once: either by
/// [`JobWorkspace::release`] at the end of the pipeline, or by the drop
/// backstop when the owning future is cancelled or panics. Removal
/// failures are logged and swallowed — a leftover directory must never
/// turn a finished job into an error.
#[derive(Debug)]
pub struct JobWorkspace {
    path: PathBuf,
    released: bool,
}

impl JobWorkspace {
    /// Create `<root>/<job_id>` and claim it for this job.
    ///
    /// `create_dir` refuses to reuse an existing path, so a fresh job id
    /// guarantees no two jobs ever share a workspace.
    pub async fn allocate(root: impl AsRef<Path>, job_id: &JobId) -> MediaResult<Self> {
        let root = root.as_ref();
        tokio::fs::create_dir_all(root).await?;

        let path = root.join(job_id.as_str());
        tokio::fs::create_dir(&path).await?;
        debug!(job_id = %job_id, path = %path.display(), "Allocated workspace");

        Ok(Self {
            path,
            released: false,
        })
    }

    /// The workspace directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path for a file inside the workspace. `name` must already be a
    /// sanitized basename.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Remove the workspace. Errors are logged, never propagated.
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = tokio::fs::remove_dir_all(&self.path).await {
            warn!(path = %self.path.display(), error = %e, "Failed to remove workspace");
        } else {
            debug!(path = %self.path.display(), "Released workspace");
        }
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove workspace on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_allocate_creates_directory() {
        let root = TempDir::new().unwrap();
        let job_id = JobId::new();

        let ws = JobWorkspace::allocate(root.path(), &job_id).await.unwrap();
        assert!(ws.path().is_dir());
        assert!(ws.path().starts_with(root.path()));
    }

    #[tokio::test]
    async fn test_release_removes_directory() {
        let root = TempDir::new().unwrap();
        let ws = JobWorkspace::allocate(root.path(), &JobId::new()).await.unwrap();
        let path = ws.path().to_path_buf();

        tokio::fs::write(path.join("input.png"), b"data").await.unwrap();
        ws.release().await;

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let root = TempDir::new().unwrap();
        let path = {
            let ws = JobWorkspace::allocate(root.path(), &JobId::new()).await.unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_distinct_jobs_get_distinct_paths() {
        let root = TempDir::new().unwrap();
        let a = JobWorkspace::allocate(root.path(), &JobId::new()).await.unwrap();
        let b = JobWorkspace::allocate(root.path(), &JobId::new()).await.unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    async fn test_same_job_id_cannot_be_allocated_twice() {
        let root = TempDir::new().unwrap();
        let job_id = JobId::new();
        let _ws = JobWorkspace::allocate(root.path(), &job_id).await.unwrap();
        assert!(JobWorkspace::allocate(root.path(), &job_id).await.is_err());
    }
}
