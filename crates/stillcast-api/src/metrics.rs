//! Prometheus metrics for the API server.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_COMPLETED_TOTAL: &str = "stillcast_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "stillcast_jobs_failed_total";
    pub const JOB_DURATION_SECONDS: &str = "stillcast_job_duration_seconds";
    pub const ENCODE_DURATION_SECONDS: &str = "stillcast_encode_duration_seconds";
    pub const UPLOAD_DURATION_SECONDS: &str = "stillcast_upload_duration_seconds";
}

/// Record a completed job with its total wall-clock duration.
pub fn record_job_completed(duration_secs: f64) {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
    histogram!(names::JOB_DURATION_SECONDS).record(duration_secs);
}

/// Record a failed job by failure kind.
pub fn record_job_failed(kind: &'static str) {
    counter!(names::JOBS_FAILED_TOTAL, "kind" => kind).increment(1);
}

/// Record encoder wall-clock duration.
pub fn record_encode_duration(duration_secs: f64) {
    histogram!(names::ENCODE_DURATION_SECONDS).record(duration_secs);
}

/// Record upload wall-clock duration.
pub fn record_upload_duration(duration_secs: f64) {
    histogram!(names::UPLOAD_DURATION_SECONDS).record(duration_secs);
}
