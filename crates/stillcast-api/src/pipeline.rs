//! The per-request job pipeline.
//!
//! One job per inbound request: allocate a workspace, stage the inputs,
//! run the encoder, publish the artifact, mint the retrieval link, and
//! release the workspace no matter which branch was taken. Jobs share no
//! in-memory state; isolation reduces to the job-id-partitioned
//! filesystem and storage namespaces.

use std::path::Path;
use std::time::Instant;

use tracing::{error, info};

use stillcast_media::{compose_still_video, output_filename, JobWorkspace, MediaError};
use stillcast_models::{JobError, JobId, JobState, Resolution};
use stillcast_storage::StorageError;

use crate::metrics;
use crate::state::AppState;

/// One staged upload: sanitized filename plus the raw bytes.
#[derive(Debug)]
pub struct StagedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A validated submission, ready for the pipeline.
#[derive(Debug)]
pub struct Submission {
    pub image: StagedFile,
    pub audio: StagedFile,
    pub resolution: Resolution,
}

/// Outcome of a completed job.
#[derive(Debug)]
pub struct PublishedJob {
    pub job_id: JobId,
    pub url: String,
}

/// Run one job to a terminal state.
///
/// The workspace is released exactly once, after the job reaches
/// `Completed` or `Failed`; the drop backstop inside [`JobWorkspace`]
/// covers cancellation and panics. Release failures never turn a
/// successful job into a failed response.
pub async fn run_job(state: &AppState, submission: Submission) -> Result<PublishedJob, JobError> {
    let job_id = JobId::new();
    let started = Instant::now();
    info!(
        job_id = %job_id,
        state = %JobState::Created,
        resolution = %submission.resolution,
        "Job created"
    );

    let workspace = JobWorkspace::allocate(&state.config.scratch_root, &job_id)
        .await
        .map_err(|e| {
            error!(job_id = %job_id, error = %e, "Workspace allocation failed");
            JobError::Internal("workspace allocation failed".to_string())
        })?;

    let result = execute(state, &job_id, &workspace, submission).await;

    // Terminal state reached; release before reporting either way.
    workspace.release().await;

    match &result {
        Ok(_) => {
            metrics::record_job_completed(started.elapsed().as_secs_f64());
            info!(job_id = %job_id, state = %JobState::Completed, "Job completed");
        }
        Err(e) => {
            metrics::record_job_failed(e.kind());
            error!(job_id = %job_id, state = %JobState::Failed, error = %e, "Job failed");
        }
    }

    result
}

/// Stage, encode, publish. Every failure is classified into a `JobError`
/// kind at its origin; nothing below this function raises a raw fault.
async fn execute(
    state: &AppState,
    job_id: &JobId,
    workspace: &JobWorkspace,
    submission: Submission,
) -> Result<PublishedJob, JobError> {
    // Created -> Staged
    let image_path = workspace.file(&submission.image.filename);
    let audio_path = workspace.file(&submission.audio.filename);
    stage_file(&image_path, &submission.image.bytes).await?;
    stage_file(&audio_path, &submission.audio.bytes).await?;
    info!(job_id = %job_id, state = %JobState::Staged, "Inputs staged");

    // Staged -> Encoded
    let artifact_name = output_filename(&submission.image.filename);
    let output_path = workspace.file(&artifact_name);
    let encode_started = Instant::now();
    compose_still_video(
        &image_path,
        &audio_path,
        &output_path,
        submission.resolution,
        state.config.encode_timeout.as_secs(),
    )
    .await
    .map_err(classify_media_error)?;
    metrics::record_encode_duration(encode_started.elapsed().as_secs_f64());
    info!(
        job_id = %job_id,
        state = %JobState::Encoded,
        artifact = %artifact_name,
        "Encode finished"
    );

    // Encoded -> Published
    let upload_started = Instant::now();
    let url = state
        .storage
        .publish_video(&output_path, job_id, &artifact_name, state.config.url_ttl)
        .await
        .map_err(classify_storage_error)?;
    metrics::record_upload_duration(upload_started.elapsed().as_secs_f64());
    info!(job_id = %job_id, state = %JobState::Published, "Artifact published");

    Ok(PublishedJob {
        job_id: job_id.clone(),
        url,
    })
}

async fn stage_file(path: &Path, bytes: &[u8]) -> Result<(), JobError> {
    tokio::fs::write(path, bytes).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to stage input");
        JobError::Internal("failed to stage input".to_string())
    })
}

/// Encoder faults carry stderr tails and paths; those stay in the log.
/// The classified kind exposes only the exit code or the time budget.
fn classify_media_error(e: MediaError) -> JobError {
    match e {
        MediaError::Timeout(secs) => JobError::EncodeTimeout(secs),
        MediaError::FfmpegFailed {
            stderr, exit_code, ..
        } => {
            if let Some(tail) = stderr {
                if !tail.is_empty() {
                    error!(stderr = %tail, "FFmpeg stderr tail");
                }
            }
            JobError::EncodeFailed(match exit_code {
                Some(code) => format!("encoder exited with status {code}"),
                None => "encoder terminated by signal".to_string(),
            })
        }
        MediaError::OutputMissing(_) => {
            JobError::EncodeFailed("encoder produced no output file".to_string())
        }
        MediaError::FfmpegNotFound => JobError::Internal("ffmpeg not found in PATH".to_string()),
        MediaError::Io(e) => {
            error!(error = %e, "Encoder could not be started");
            JobError::EncodeFailed("encoder could not be started".to_string())
        }
    }
}

fn classify_storage_error(e: StorageError) -> JobError {
    match e {
        StorageError::Unavailable(msg) => {
            error!(error = %msg, "Storage target unavailable");
            JobError::StorageUnavailable("storage backend unavailable".to_string())
        }
        other => {
            error!(error = %other, "Artifact publication failed");
            JobError::PublishFailed("artifact upload or signing failed".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_error_classification() {
        assert!(matches!(
            classify_media_error(MediaError::Timeout(300)),
            JobError::EncodeTimeout(300)
        ));
        assert!(matches!(
            classify_media_error(MediaError::ffmpeg_failed("boom", None, Some(1))),
            JobError::EncodeFailed(_)
        ));
        assert!(matches!(
            classify_media_error(MediaError::OutputMissing("out.mp4".into())),
            JobError::EncodeFailed(_)
        ));
    }

    #[test]
    fn test_encode_failure_message_carries_no_paths() {
        let e = classify_media_error(MediaError::ffmpeg_failed(
            "FFmpeg exited with non-zero status",
            Some("/tmp/job-1/cover.png: No such file".to_string()),
            Some(1),
        ));
        assert_eq!(e.to_string(), "encode failed: encoder exited with status 1");
    }

    #[test]
    fn test_storage_error_classification() {
        assert!(matches!(
            classify_storage_error(StorageError::Unavailable("NoSuchBucket".into())),
            JobError::StorageUnavailable(_)
        ));
        assert!(matches!(
            classify_storage_error(StorageError::UploadFailed("EntityTooLarge".into())),
            JobError::PublishFailed(_)
        ));
        assert!(matches!(
            classify_storage_error(StorageError::PresignFailed("bad expiry".into())),
            JobError::PublishFailed(_)
        ));
    }
}
