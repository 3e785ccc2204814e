//! FFmpeg command builder and runner.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// How many trailing stderr lines to keep for the process log.
const STDERR_TAIL_LINES: usize = 24;

/// One input file plus the arguments that precede its `-i`.
#[derive(Debug, Clone)]
struct Input {
    pre_args: Vec<String>,
    path: PathBuf,
}

/// Builder for FFmpeg commands.
///
/// Arguments are collected into a fixed vector and handed to the process
/// spawner as-is. Nothing passes through a shell, so a hostile filename is
/// always a single argv element and never becomes extra flags.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    output: PathBuf,
    output_args: Vec<String>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command producing `output`.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input file with no preceding arguments.
    pub fn input(self, path: impl AsRef<Path>) -> Self {
        self.input_with_args(std::iter::empty::<String>(), path)
    }

    /// Add an input file preceded by its own arguments (e.g. `-loop 1`).
    pub fn input_with_args<I, S>(mut self, args: I, path: impl AsRef<Path>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.push(Input {
            pre_args: args.into_iter().map(Into::into).collect(),
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    /// Add an output argument (after the inputs).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set encoder tuning profile.
    pub fn tune(self, profile: impl Into<String>) -> Self {
        self.output_arg("-tune").output_arg(profile)
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Stop the output at the shorter of the input streams.
    pub fn shortest(self) -> Self {
        self.output_arg("-shortest")
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        for input in &self.inputs {
            args.extend(input.pre_args.iter().cloned());
            args.push("-i".to_string());
            args.push(input.path.to_string_lossy().to_string());
        }

        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with a bounded wait.
///
/// The child is spawned with `kill_on_drop`, so dropping the in-flight
/// future (client disconnect, task cancellation) terminates the encoder
/// instead of leaving it running to completion.
#[derive(Debug, Default)]
pub struct FfmpegRunner {
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self { timeout_secs: None }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command to completion.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // FFmpeg reports errors on stderr; keep a tail for the log.
        let stderr = child.stderr.take().expect("stderr not captured");
        let tail_handle = tokio::spawn(async move {
            let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
            let mut reader = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail.into_iter().collect::<Vec<_>>().join("\n")
        });

        let status = match self.timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), child.wait()).await {
                    Ok(result) => result?,
                    Err(_) => {
                        warn!("FFmpeg timed out after {} seconds, killing process", secs);
                        let _ = child.kill().await;
                        return Err(MediaError::Timeout(secs));
                    }
                }
            }
            None => child.wait().await?,
        };

        let stderr_tail = tail_handle.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(stderr_tail),
                status.code(),
            ))
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = FfmpegCommand::new("out.mp4")
            .input_with_args(["-loop", "1"], "image.png")
            .input("audio.mp3")
            .video_codec("libx264")
            .shortest();

        let args = cmd.build_args();
        let loop_pos = args.iter().position(|a| a == "-loop").unwrap();
        let first_i = args.iter().position(|a| a == "-i").unwrap();
        assert!(loop_pos < first_i, "per-input args must precede their -i");
        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 2);
        assert!(args.contains(&"-c:v".to_string()));
        assert!(args.contains(&"-shortest".to_string()));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_hostile_filename_stays_one_argument() {
        let cmd = FfmpegCommand::new("out.mp4").input("a; rm -rf $HOME.png");
        let args = cmd.build_args();
        assert!(args.contains(&"a; rm -rf $HOME.png".to_string()));
    }

    #[test]
    fn test_overwrite_and_log_level_defaults() {
        let args = FfmpegCommand::new("out.mp4").build_args();
        assert_eq!(args[0], "-y");
        assert_eq!(args[1], "-v");
        assert_eq!(args[2], "error");
    }
}
