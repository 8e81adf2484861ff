//! Mapping of extraction failures to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use readable_core::ReadableError;
use serde::Serialize;

/// Failure of a request, rendered as `{ "title": "", "text": "", "error": .. }`
#[derive(Debug)]
pub enum ApiError {
    /// The request itself is unusable (missing input, bad JSON shape)
    BadRequest(String),
    /// Fetching or extraction failed
    Readable(ReadableError),
    /// The extraction task panicked or was cancelled
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    title: &'static str,
    text: &'static str,
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Readable(err) => match err {
                ReadableError::EmptyCandidateSet => StatusCode::UNPROCESSABLE_ENTITY,
                ReadableError::MalformedDocument(_) | ReadableError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                ReadableError::HttpStatus { .. } | ReadableError::HttpError(_) => StatusCode::BAD_GATEWAY,
                ReadableError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::Readable(err) => err.to_string(),
        }
    }
}

impl From<ReadableError> for ApiError {
    fn from(err: ReadableError) -> Self {
        ApiError::Readable(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %error, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), %error, "request rejected");
        }

        (status, Json(ErrorBody { title: "", text: "", error })).into_response()
    }
}
