//! Still-image + audio composition.

use std::path::Path;

use tracing::info;

use stillcast_models::Resolution;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::still_frame_filter;

/// Audio bitrate used for every composition.
const AUDIO_BITRATE: &str = "192k";

/// Build the composition command: loop the image, mux the audio, and stop
/// at the end of the shorter stream.
pub fn compose_command(
    image: &Path,
    audio: &Path,
    output: &Path,
    resolution: Resolution,
) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input_with_args(["-loop", "1"], image)
        .input(audio)
        .video_codec("libx264")
        .tune("stillimage")
        .audio_codec("aac")
        .audio_bitrate(AUDIO_BITRATE)
        .video_filter(still_frame_filter(resolution))
        .shortest()
}

/// Compose a video from a still image and an audio track.
///
/// Blocks (asynchronously) until the encoder exits or the timeout kills
/// it. An exit code of 0 without an output file on disk is still a
/// failure.
pub async fn compose_still_video(
    image: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
    resolution: Resolution,
    timeout_secs: u64,
) -> MediaResult<()> {
    let image = image.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();

    info!(
        image = %image.display(),
        audio = %audio.display(),
        output = %output.display(),
        resolution = %resolution,
        "Composing still video"
    );

    let cmd = compose_command(image, audio, output, resolution);
    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await?;

    if tokio::fs::metadata(output).await.is_err() {
        return Err(MediaError::OutputMissing(output.to_path_buf()));
    }

    info!(output = %output.display(), "Composition finished");
    Ok(())
}

/// Deterministic output filename derived from the image's base name.
pub fn output_filename(image_filename: &str) -> String {
    let stem = Path::new(image_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    format!("video_output_{stem}.mp4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_command_shape() {
        let cmd = compose_command(
            Path::new("cover.png"),
            Path::new("track.mp3"),
            Path::new("video_output_cover.mp4"),
            Resolution::Hd1080,
        );
        let args = cmd.build_args();

        let loop_pos = args.iter().position(|a| a == "-loop").unwrap();
        let image_pos = args.iter().position(|a| a == "cover.png").unwrap();
        let audio_pos = args.iter().position(|a| a == "track.mp3").unwrap();
        assert!(loop_pos < image_pos && image_pos < audio_pos);

        let vf_pos = args.iter().position(|a| a == "-vf").unwrap();
        assert!(args[vf_pos + 1].contains("scale=1920:1080"));

        let tune_pos = args.iter().position(|a| a == "-tune").unwrap();
        assert_eq!(args[tune_pos + 1], "stillimage");
        let bitrate_pos = args.iter().position(|a| a == "-b:a").unwrap();
        assert_eq!(args[bitrate_pos + 1], "192k");
        assert!(args.contains(&"-shortest".to_string()));
        assert_eq!(args.last().unwrap(), "video_output_cover.mp4");
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(output_filename("cover.png"), "video_output_cover.mp4");
        assert_eq!(output_filename("no_extension"), "video_output_no_extension.mp4");
        assert_eq!(output_filename(""), "video_output_image.mp4");
    }
}
