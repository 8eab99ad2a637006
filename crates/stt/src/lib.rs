#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Client for the speech-to-text upstream
//!
//! One transcription service is configured at a time. The [`Transcriber`]
//! reads a staged audio file, uploads it as multipart form data and decodes
//! the JSON transcript, all bounded by the caller's deadline.

mod error;
mod http_client;
mod provider;
mod transcriber;
mod types;

pub use error::{Result, SttError};
pub use transcriber::Transcriber;
pub use types::{AudioFile, TranscriptionResponse};

/// Build the transcription client from configuration
///
/// # Errors
///
/// Returns an error if the configured provider cannot be initialized
pub fn build_transcriber(config: &earshot_config::SttConfig) -> anyhow::Result<Transcriber> {
    Transcriber::new(config).map_err(|e| anyhow::anyhow!("Failed to initialize transcription client: {e}"))
}
