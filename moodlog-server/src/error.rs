//! HTTP error mapping.
//!
//! Every handler failure ends up as an `ApiError`, which renders as a status
//! code plus `{"error": <message>, "status": "error"}`.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use moodlog_core::{JournalError, SpeechError};
use serde::Serialize;
use thiserror::Error;

pub const SPEECH_SERVICE_FAILED: &str = "Could not request results from speech service";

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 - missing or invalid input
    #[error("{0}")]
    BadRequest(String),
    /// 404 - unknown entry
    #[error("{0}")]
    NotFound(String),
    /// 500 - storage or upstream failure
    #[error("{0}")]
    Internal(String),
    /// 503 - dependency not reachable
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Status code and JSON body, for the inner (axum-free) handler functions.
    pub fn into_parts(self) -> (StatusCode, serde_json::Value) {
        let status = self.status_code();
        let body = serde_json::to_value(ErrorResponse::new(self.to_string()))
            .unwrap_or_else(|_| serde_json::json!({ "status": "error" }));
        (status, body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_parts();
        (status, Json(body)).into_response()
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Validation(msg) => ApiError::BadRequest(msg),
            JournalError::NotFound(_) => ApiError::NotFound("Entry not found".to_string()),
            JournalError::Database(e) => {
                tracing::error!(error = %e, "Entry store query failed");
                ApiError::Internal("Database error".to_string())
            }
        }
    }
}

/// Client-side failures carry their message through. Service failures are
/// logged and replaced with a fixed message.
impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        if err.is_client_error() {
            return ApiError::BadRequest(err.to_string());
        }
        tracing::error!(error = %err, "Speech recognition failed");
        ApiError::Internal(SPEECH_SERVICE_FAILED.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_errors_map_to_status_codes() {
        let validation: ApiError = JournalError::Validation("Content is required".into()).into();
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let missing: ApiError = JournalError::NotFound(7).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let db: ApiError = JournalError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(db.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_speech_errors_split_client_and_server() {
        let unrecognized: ApiError = SpeechError::Unrecognized.into();
        assert_eq!(unrecognized.status_code(), StatusCode::BAD_REQUEST);

        let invalid: ApiError = SpeechError::InvalidAudio("not a RIFF file".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let upstream: ApiError = SpeechError::Service("status 503".into()).into();
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_speech_service_failure_message_is_fixed() {
        let upstream: ApiError =
            SpeechError::Service("status 403: bad key abc123 for project".into()).into();
        let (status, body) = upstream.into_parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], SPEECH_SERVICE_FAILED);
    }

    #[test]
    fn test_speech_client_errors_keep_their_message() {
        let (_, body) = ApiError::from(SpeechError::InvalidAudio("not a RIFF file".into())).into_parts();
        assert_eq!(body["error"], "Invalid audio: not a RIFF file");

        let (_, body) = ApiError::from(SpeechError::Unrecognized).into_parts();
        assert_eq!(body["error"], "Could not understand audio");
    }

    #[test]
    fn test_into_parts_body_shape() {
        let (status, body) = ApiError::NotFound("Entry not found".into()).into_parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Entry not found", "status": "error"}));
    }
}
