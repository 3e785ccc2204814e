//! Axum HTTP API server.
//!
//! This crate provides:
//! - The upload endpoint and the per-request job pipeline
//! - Health and readiness probes
//! - Prometheus metrics
//! - HTTP mapping for the job failure taxonomy

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod pipeline;
pub mod routes;
pub mod security;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
