//! Wire types for Ollama's `/api/generate` endpoint

use serde::{Deserialize, Serialize};

/// Join the caller's instruction and the transcript into one prompt
pub fn compose_prompt(prompt: &str, transcript: &str) -> String {
    format!("{prompt}\n\nTranscription: {transcript}")
}

/// Non-streaming generation request
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    /// Always `false`; the whole completion arrives in one body
    pub stream: bool,
}

/// Generation result
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Completion flag
    #[serde(default)]
    pub done: bool,
    /// Reason generation stopped (`stop`, `length`, ...)
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Total time spent generating, in nanoseconds
    #[serde(default)]
    pub total_duration: Option<u64>,
    /// Number of tokens generated
    #[serde(default)]
    pub eval_count: Option<u64>,
}
