//! Job submission handler.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::response::Redirect;
use tracing::debug;

use stillcast_models::{JobError, Resolution};

use crate::error::{ApiError, ApiResult};
use crate::pipeline::{self, StagedFile, Submission};
use crate::security::sanitize_filename;
use crate::state::AppState;

/// Accept a multipart submission and run it as one job.
///
/// On success the client is redirected straight to the time-limited
/// retrieval URL. Validation happens before any workspace is allocated,
/// so a rejected request leaves nothing on disk.
pub async fn create_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Redirect> {
    let mut image: Option<StagedFile> = None;
    let mut audio: Option<StagedFile> = None;
    let mut resolution: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => image = read_file_field(field, "image").await?,
            "audio" => audio = read_file_field(field, "audio").await?,
            "resolution" => {
                resolution = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("failed to read resolution field: {e}"))
                })?);
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let submission = validate_submission(image, audio, resolution)?;
    let published = pipeline::run_job(&state, submission).await?;
    Ok(Redirect::to(&published.url))
}

/// Read one uploaded file field. An empty body counts as missing.
async fn read_file_field(
    field: Field<'_>,
    fallback: &'static str,
) -> ApiResult<Option<StagedFile>> {
    let filename = sanitize_filename(field.file_name().unwrap_or(""), fallback);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("failed to read {fallback} field: {e}")))?;

    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(StagedFile {
        filename,
        bytes: bytes.to_vec(),
    }))
}

/// All three fields must be present. The resolution value itself is only
/// a hint and falls back to 720p when unrecognized.
fn validate_submission(
    image: Option<StagedFile>,
    audio: Option<StagedFile>,
    resolution: Option<String>,
) -> Result<Submission, JobError> {
    let image = image.ok_or(JobError::MissingInput("image"))?;
    let mut audio = audio.ok_or(JobError::MissingInput("audio"))?;
    let resolution = resolution.ok_or(JobError::MissingInput("resolution"))?;

    // Both uploads land in one directory; keep the audio from clobbering
    // the image when the client sent the same filename for both.
    if audio.filename == image.filename {
        audio.filename = format!("audio_{}", audio.filename);
    }

    Ok(Submission {
        image,
        audio,
        resolution: Resolution::from_param(&resolution),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(name: &str) -> Option<StagedFile> {
        Some(StagedFile {
            filename: name.to_string(),
            bytes: vec![1, 2, 3],
        })
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(matches!(
            validate_submission(None, staged("a.mp3"), Some("720p".into())),
            Err(JobError::MissingInput("image"))
        ));
        assert!(matches!(
            validate_submission(staged("a.png"), None, Some("720p".into())),
            Err(JobError::MissingInput("audio"))
        ));
        assert!(matches!(
            validate_submission(staged("a.png"), staged("a.mp3"), None),
            Err(JobError::MissingInput("resolution"))
        ));
    }

    #[test]
    fn test_unknown_resolution_falls_back() {
        let submission =
            validate_submission(staged("a.png"), staged("a.mp3"), Some("4k".into())).unwrap();
        assert_eq!(submission.resolution, Resolution::Hd720);
    }

    #[test]
    fn test_duplicate_filenames_are_disambiguated() {
        let submission =
            validate_submission(staged("same.bin"), staged("same.bin"), Some("720p".into()))
                .unwrap();
        assert_eq!(submission.image.filename, "same.bin");
        assert_eq!(submission.audio.filename, "audio_same.bin");
    }
}
