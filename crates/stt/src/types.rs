use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Audio staged on local disk, ready to be uploaded
#[derive(Debug, Clone)]
pub struct AudioFile {
    /// Location of the staged bytes
    pub path: PathBuf,
    /// Filename the client uploaded, forwarded to the service
    pub filename: String,
    /// Content type the client declared for the file part
    pub content_type: Option<String>,
}

/// Transcript returned by the service
///
/// Only `text` is required; whisper-asr-webservice also reports segments
/// and the detected language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    /// Transcribed text
    pub text: String,
    /// Per-segment timing metadata, passed through untouched
    #[serde(default)]
    pub segments: Vec<serde_json::Value>,
    /// Detected or requested language
    #[serde(default)]
    pub language: Option<String>,
}
