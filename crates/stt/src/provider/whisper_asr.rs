use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{
    error::SttError,
    http_client::http_client,
    types::{AudioFile, TranscriptionResponse},
};

use super::{SttProvider, decode_response, endpoint, file_part};

/// whisper-asr-webservice provider
///
/// Uploads the audio as the `audio_file` field of `POST /asr`.
pub(crate) struct WhisperAsrProvider {
    client: Client,
    base_url: Url,
    language: Option<String>,
}

impl WhisperAsrProvider {
    pub fn new(base_url: Url, language: Option<String>) -> Self {
        Self {
            client: http_client(),
            base_url,
            language,
        }
    }
}

#[async_trait]
impl SttProvider for WhisperAsrProvider {
    async fn transcribe(&self, audio: Vec<u8>, file: &AudioFile) -> crate::error::Result<TranscriptionResponse> {
        let url = endpoint(&self.base_url, "asr");

        tracing::debug!(
            "whisper-asr transcription request: {} bytes, filename={}",
            audio.len(),
            file.filename,
        );

        let form = reqwest::multipart::Form::new().part("audio_file", file_part(audio, file)?);

        let mut query = vec![("output", "json")];
        if let Some(language) = &self.language {
            query.push(("language", language.as_str()));
        }

        let response = self
            .client
            .post(&url)
            .query(&query)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("whisper-asr request failed: {e}");
                SttError::Transport(e.to_string())
            })?;

        let result: TranscriptionResponse = decode_response(self.name(), response).await?;

        tracing::debug!(language = ?result.language, "whisper-asr transcription complete");

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "whisper-asr"
    }
}
