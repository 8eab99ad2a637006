use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while calling the inference service
#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection failure or transport-level timeout
    #[error("failed to send request: {0}")]
    Transport(String),

    /// The request deadline ran out before generation finished
    #[error("failed to send request: request deadline exceeded")]
    DeadlineExceeded,

    /// The service answered with a non-success status
    #[error("ollama returned non-200 status: {status}, body: {body}")]
    Upstream { status: u16, body: String },

    /// A success response whose body is not the expected JSON
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
