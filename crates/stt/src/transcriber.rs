use earshot_config::{SttConfig, SttProviderType};
use tokio::time::Instant;

use crate::{
    error::SttError,
    provider::{SttProvider, openai::OpenAiProvider, whisper_asr::WhisperAsrProvider},
    types::{AudioFile, TranscriptionResponse},
};

/// Client for the configured transcription service
pub struct Transcriber {
    provider: Box<dyn SttProvider>,
}

impl Transcriber {
    /// Create the client for the provider named in configuration
    pub fn new(config: &SttConfig) -> crate::error::Result<Self> {
        if config.base_url.cannot_be_a_base() {
            return Err(SttError::Config(format!(
                "transcription base URL '{}' cannot be used as a base",
                config.base_url
            )));
        }

        let provider: Box<dyn SttProvider> = match config.provider_type {
            SttProviderType::WhisperAsr => Box::new(WhisperAsrProvider::new(
                config.base_url.clone(),
                config.language.clone(),
            )),
            SttProviderType::Openai => Box::new(OpenAiProvider::new(
                config.base_url.clone(),
                config.api_key.clone(),
                config.model.clone(),
                config.language.clone(),
            )),
        };

        tracing::debug!(provider = provider.name(), base_url = %config.base_url, "transcription client initialized");

        Ok(Self { provider })
    }

    /// Name of the active provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Transcribe a staged audio file
    ///
    /// The upload is abandoned once `deadline` passes, in which case
    /// [`SttError::DeadlineExceeded`] is returned.
    pub async fn transcribe(
        &self,
        audio: &AudioFile,
        deadline: Instant,
    ) -> crate::error::Result<TranscriptionResponse> {
        let upload = async {
            let bytes = tokio::fs::read(&audio.path).await?;
            self.provider.transcribe(bytes, audio).await
        };

        tokio::time::timeout_at(deadline, upload).await.map_err(|_| {
            tracing::warn!(provider = self.provider.name(), "transcription deadline exceeded");
            SttError::DeadlineExceeded
        })?
    }
}
