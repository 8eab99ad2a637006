use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Errors raised while talking to the transcription service
#[derive(Debug, Error)]
pub enum SttError {
    /// Connection failure or transport-level timeout
    #[error("failed to send request: {0}")]
    Transport(String),

    /// The request deadline ran out before the service answered
    #[error("failed to send request: request deadline exceeded")]
    DeadlineExceeded,

    /// The service answered with a non-success status
    #[error("whisper returned non-200 status: {status}, body: {body}")]
    Upstream { status: u16, body: String },

    /// A success response whose body is not the expected JSON
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The staged audio file could not be read
    #[error("failed to read staged audio: {0}")]
    Io(#[from] std::io::Error),

    /// Request could not be built from the upload metadata
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
