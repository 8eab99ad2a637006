#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Client for the Ollama-compatible inference upstream

mod client;
mod error;
mod http_client;
mod protocol;

pub use client::OllamaClient;
pub use error::{LlmError, Result};
pub use protocol::{GenerateRequest, GenerateResponse, compose_prompt};

/// Build the inference client from configuration
///
/// # Errors
///
/// Returns an error if the configured base URL cannot be used
pub fn build_client(config: &earshot_config::LlmConfig) -> anyhow::Result<OllamaClient> {
    OllamaClient::new(config).map_err(|e| anyhow::anyhow!("Failed to initialize inference client: {e}"))
}
