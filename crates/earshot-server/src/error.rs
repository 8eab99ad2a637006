use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Terminal failures of a `/process` request
///
/// Inference failures are deliberately absent: once a transcript exists the
/// request still succeeds, carrying the failure in the response text.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Every pipeline slot is taken
    #[error("Server is at capacity, please try again later")]
    CapacityExceeded,

    /// Anything other than `POST`
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The multipart form is unreadable or lacks the audio file
    #[error("{0}")]
    MalformedRequest(String),

    /// The upload could not be written to the staging area
    #[error("{0}")]
    Staging(String),

    /// The transcription service call failed
    #[error("Transcription failed: {0}")]
    Transcription(#[source] stt::SttError),

    /// A handler panicked
    #[error("Internal server error")]
    Internal,
}

impl ProcessError {
    /// HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::CapacityExceeded => StatusCode::SERVICE_UNAVAILABLE,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::Staging(_) | Self::Transcription(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for logs and metrics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CapacityExceeded => "rejected",
            Self::MethodNotAllowed | Self::MalformedRequest(_) => "bad_request",
            Self::Staging(_) => "staging_failed",
            Self::Transcription(_) => "transcription_failed",
            Self::Internal => "internal_error",
        }
    }
}

/// Errors are sent as plain-text diagnostics, never JSON
impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
