//! Job identity, lifecycle states, and the failure taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a job.
///
/// The id scopes both the local workspace directory and the remote storage
/// key, so two concurrent jobs never collide on disk or in the object store
/// even with identical input filenames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle state.
///
/// A job moves `Created -> Staged -> Encoded -> Published -> Completed`,
/// with a transition to `Failed` possible from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Job allocated, nothing staged yet
    #[default]
    Created,
    /// Inputs written into the workspace
    Staged,
    /// Encoder produced the output file
    Encoded,
    /// Artifact uploaded and retrieval URL minted
    Published,
    /// Terminal success
    Completed,
    /// Terminal failure
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Created => "created",
            JobState::Staged => "staged",
            JobState::Encoded => "encoded",
            JobState::Published => "published",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure taxonomy for the job pipeline.
///
/// Every component failure is converted to one of these kinds at its
/// origin; no raw process or network fault crosses into the orchestrator
/// or the HTTP layer. Messages here are safe to show to a client — stderr
/// tails, command lines, and paths stay in the process log.
#[derive(Debug, Error)]
pub enum JobError {
    /// A required multipart field was absent or empty.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// The encoder exited non-zero or produced no output file.
    #[error("encode failed: {0}")]
    EncodeFailed(String),

    /// The encoder exceeded its time budget and was killed.
    #[error("encode timed out after {0} seconds")]
    EncodeTimeout(u64),

    /// Upload or URL signing failed.
    #[error("publish failed: {0}")]
    PublishFailed(String),

    /// The storage target is unreachable or misconfigured.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Unexpected infrastructure fault (workspace allocation, staging IO).
    #[error("internal error: {0}")]
    Internal(String),
}

impl JobError {
    /// Stable kind label, used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::MissingInput(_) => "missing_input",
            JobError::EncodeFailed(_) => "encode_failed",
            JobError::EncodeTimeout(_) => "encode_timeout",
            JobError::PublishFailed(_) => "publish_failed",
            JobError::StorageUnavailable(_) => "storage_unavailable",
            JobError::Internal(_) => "internal",
        }
    }
}
