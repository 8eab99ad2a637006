use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Transcription upstream configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttConfig {
    /// Provider protocol
    #[serde(rename = "type", default)]
    pub provider_type: SttProviderType,
    /// Base URL of the transcription service
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// API key, sent as a bearer token when set
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Model name for providers that take one (`openai` only)
    #[serde(default)]
    pub model: Option<String>,
    /// Language hint (ISO 639-1) forwarded to the upstream
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            provider_type: SttProviderType::default(),
            base_url: default_base_url(),
            api_key: None,
            model: None,
            language: None,
        }
    }
}

/// Supported transcription protocols
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SttProviderType {
    /// whisper-asr-webservice (`POST /asr`)
    #[default]
    WhisperAsr,
    /// OpenAI-compatible `POST /audio/transcriptions`
    Openai,
}

fn default_base_url() -> Url {
    Url::parse("http://whisper:9000").expect("valid default URL")
}
