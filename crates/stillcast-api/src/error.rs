//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use stillcast_models::JobError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Job(#[from] JobError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Job(e) => match e {
                JobError::MissingInput(_) => StatusCode::BAD_REQUEST,
                JobError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                JobError::EncodeFailed(_)
                | JobError::EncodeTimeout(_)
                | JobError::PublishFailed(_)
                | JobError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side faults get a fixed message; stderr tails, command
        // lines, and paths stay in the process log.
        let detail = if status.is_server_error() {
            match &self {
                ApiError::Job(JobError::StorageUnavailable(_)) => {
                    "Storage backend is unavailable. Try again later."
                }
                ApiError::Job(JobError::EncodeTimeout(_)) => {
                    "Video creation exceeded the time budget."
                }
                _ => "An error occurred during video creation. Check the logs for details.",
            }
            .to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse { detail };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: JobError) -> StatusCode {
        ApiError::from(e).status_code()
    }

    #[test]
    fn test_taxonomy_status_mapping() {
        assert_eq!(status_of(JobError::MissingInput("audio")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(JobError::EncodeFailed("exit 1".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(JobError::EncodeTimeout(300)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(JobError::PublishFailed("upload".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(JobError::StorageUnavailable("bucket".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(JobError::Internal("workspace".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
