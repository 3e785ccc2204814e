//! S3-compatible object storage client.
//!
//! This crate provides:
//! - File upload under job-scoped keys
//! - Presigned GET URL generation
//! - Bucket reachability checks for startup validation and readiness probes

pub mod client;
pub mod error;
pub mod publish;

pub use client::{StorageClient, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use publish::{artifact_key, content_type_for};
