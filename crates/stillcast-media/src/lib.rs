//! FFmpeg CLI wrapper for still-image video composition.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building (fixed argument vector, no shell)
//! - A runner with a bounded wait and kill-on-drop cancellation
//! - Scale/pad/format filter construction per target resolution
//! - Per-job scratch workspace management

pub mod command;
pub mod compose;
pub mod error;
pub mod filters;
pub mod workspace;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use compose::{compose_still_video, output_filename};
pub use error::{MediaError, MediaResult};
pub use filters::still_frame_filter;
pub use workspace::JobWorkspace;
