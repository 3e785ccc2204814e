//! Shared data models for the Stillcast backend.
//!
//! This crate provides:
//! - Job identity and lifecycle states
//! - The job failure taxonomy
//! - The output resolution selector

pub mod job;
pub mod resolution;

pub use job::{JobError, JobId, JobState};
pub use resolution::Resolution;
