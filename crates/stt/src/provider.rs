pub(crate) mod openai;
pub(crate) mod whisper_asr;

use async_trait::async_trait;
use reqwest::multipart::Part;
use serde::de::DeserializeOwned;

use crate::{
    error::SttError,
    types::{AudioFile, TranscriptionResponse},
};

/// Trait for transcription protocol implementations
#[async_trait]
pub(crate) trait SttProvider: Send + Sync {
    /// Upload `audio` and return the transcript
    async fn transcribe(&self, audio: Vec<u8>, file: &AudioFile) -> crate::error::Result<TranscriptionResponse>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Build the multipart file part, keeping the client's filename
pub(crate) fn file_part(audio: Vec<u8>, file: &AudioFile) -> crate::error::Result<Part> {
    let part = Part::bytes(audio).file_name(file.filename.clone());

    match file.content_type.as_deref() {
        Some(content_type) => part
            .mime_str(content_type)
            .map_err(|e| SttError::InvalidRequest(format!("Invalid content type: {e}"))),
        None => Ok(part),
    }
}

/// Check the status of an upstream response and decode its JSON body
pub(crate) async fn decode_response<T: DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> crate::error::Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!("{provider} API error ({status}): {body}");

        return Err(SttError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(|e| {
        tracing::error!("Failed to read {provider} response body: {e}");
        SttError::Transport(format!("failed to read response body: {e}"))
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!("Failed to parse {provider} response: {e}");
        SttError::Decode(e.to_string())
    })
}

/// Join a path onto a base URL without dropping any base path segments
pub(crate) fn endpoint(base_url: &url::Url, path: &str) -> String {
    format!("{}/{path}", base_url.as_str().trim_end_matches('/'))
}
