//! Programmatic configuration builder for integration tests

use std::{net::SocketAddr, path::Path};

use earshot_config::{Config, SttProviderType};
use secrecy::SecretString;

use super::{mock_ollama::MockOllama, mock_whisper::MockWhisper};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder wired to the two mock upstreams
    pub fn new(whisper: &MockWhisper, ollama: &MockOllama) -> Self {
        let mut config = Config::default();
        config.server.listen_address = SocketAddr::from(([127, 0, 0, 1], 0));
        config.stt.base_url = whisper.base_url().parse().expect("valid URL");
        config.llm.base_url = ollama.base_url().parse().expect("valid URL");

        Self { config }
    }

    /// Talk to the transcription mock through its OpenAI-compatible route
    pub fn with_openai_stt(mut self, whisper: &MockWhisper, api_key: &str) -> Self {
        self.config.stt.provider_type = SttProviderType::Openai;
        self.config.stt.base_url = whisper.openai_base_url().parse().expect("valid URL");
        self.config.stt.api_key = Some(SecretString::from(api_key));
        self
    }

    /// Point the inference client somewhere else
    pub fn with_ollama_url(mut self, url: &str) -> Self {
        self.config.llm.base_url = url.parse().expect("valid URL");
        self
    }

    /// Set the number of concurrently admitted requests
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.pipeline.max_concurrent_requests = capacity;
        self
    }

    /// Set the per-request deadline in seconds
    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.config.pipeline.request_timeout = seconds;
        self
    }

    /// Set the largest accepted request body
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.config.pipeline.max_upload_size = Some(bytes);
        self
    }

    /// Stage uploads in `dir`
    pub fn with_staging_dir(mut self, dir: &Path) -> Self {
        self.config.pipeline.staging_dir = Some(dir.to_path_buf());
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("valid test configuration");
        self.config
    }
}
