use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    error::SttError,
    http_client::http_client,
    types::{AudioFile, TranscriptionResponse},
};

use super::{SttProvider, decode_response, endpoint, file_part};

const DEFAULT_MODEL: &str = "whisper-1";

/// OpenAI-compatible transcription provider
pub(crate) struct OpenAiProvider {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    model: String,
    language: Option<String>,
}

impl OpenAiProvider {
    pub fn new(base_url: Url, api_key: Option<SecretString>, model: Option<String>, language: Option<String>) -> Self {
        Self {
            client: http_client(),
            base_url,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            language,
        }
    }
}

#[async_trait]
impl SttProvider for OpenAiProvider {
    async fn transcribe(&self, audio: Vec<u8>, file: &AudioFile) -> crate::error::Result<TranscriptionResponse> {
        let url = endpoint(&self.base_url, "audio/transcriptions");

        tracing::debug!(
            "OpenAI transcription request: {} bytes, model={}",
            audio.len(),
            self.model,
        );

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part(audio, file)?)
            .text("model", self.model.clone())
            .text("response_format", "json");

        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let mut builder = self.client.post(&url).multipart(form);

        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("OpenAI transcription request failed: {e}");
            SttError::Transport(e.to_string())
        })?;

        let result: TranscriptionResponse = decode_response(self.name(), response).await?;

        tracing::debug!("OpenAI transcription complete");

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
