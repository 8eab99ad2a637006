#![allow(clippy::must_use_candidate)]

pub mod health;
pub mod llm;
mod loader;
pub mod pipeline;
pub mod server;
pub mod stt;
pub mod telemetry;

use serde::Deserialize;

pub use health::*;
pub use llm::*;
pub use pipeline::*;
pub use server::*;
pub use stt::*;
pub use telemetry::TelemetryConfig;

/// Top-level bridge configuration
///
/// Built once at start-up and handed to the server by value; nothing reads
/// configuration from the environment after this point.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Admission, timeout and staging settings for `/process`
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Transcription upstream
    #[serde(default)]
    pub stt: SttConfig,
    /// Inference upstream
    #[serde(default)]
    pub llm: LlmConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
