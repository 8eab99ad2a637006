use serde::Deserialize;
use url::Url;

/// Model used when the caller leaves `model` empty
pub const DEFAULT_MODEL: &str = "llama3";

/// Instruction used when the caller leaves `prompt` empty
pub const DEFAULT_PROMPT: &str = "Process this transcription:";

/// Inference upstream configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL of the Ollama-compatible inference service
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_prompt")]
    pub default_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_model: default_model(),
            default_prompt: default_prompt(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("http://ollama:11434").expect("valid default URL")
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}
