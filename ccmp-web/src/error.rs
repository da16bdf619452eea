//! Error types for ccmp-web handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ccmp_common::airtable::RemoteError;
use serde_json::json;
use thiserror::Error;

use crate::submission::{SubmissionError, ValidationError, SUBMISSION_FAILED_MESSAGE};

/// Shown when the story collection cannot be fetched
pub const STORIES_UNAVAILABLE_MESSAGE: &str = "Stories are temporarily unavailable";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Form failed local validation (422)
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Same form instance already submitting (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Remote store rejected or never received a submission (502)
    #[error("Submission failed: {0}")]
    SubmissionFailed(RemoteError),

    /// Story listing failed (502)
    #[error("Upstream error: {0}")]
    Upstream(RemoteError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(v) => ApiError::Validation(v),
            SubmissionError::InFlight => {
                ApiError::Conflict("Form is already being submitted".to_string())
            }
            SubmissionError::Remote(e) => ApiError::SubmissionFailed(e),
            SubmissionError::Encode(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Remote detail stays in the logs; users only see the generic messages
        let (status, error_code, message, extra) = match self {
            ApiError::Validation(ref v) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                v.message().to_string(),
                Some(json!({ "fields": v.flagged, "invalid_email": v.invalid_email })),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::SubmissionFailed(_) => (
                StatusCode::BAD_GATEWAY,
                "SUBMISSION_FAILED",
                SUBMISSION_FAILED_MESSAGE.to_string(),
                None,
            ),
            ApiError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                STORIES_UNAVAILABLE_MESSAGE.to_string(),
                None,
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
                None,
            ),
        };

        let mut body = json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
            }
        });
        if let Some(extra) = extra {
            body["error"]["details"] = extra;
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
