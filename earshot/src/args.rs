use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use earshot_config::Config;
use url::Url;

/// Earshot audio bridge
#[derive(Debug, Parser)]
#[command(name = "earshot", about = "Transcribe uploaded audio with Whisper and run the text through Ollama")]
pub struct Args {
    /// Path to an optional configuration file
    #[arg(short, long, env = "EARSHOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the transcription service
    #[arg(long, env = "WHISPER_URL")]
    pub whisper_url: Option<Url>,

    /// Base URL of the inference service
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<Url>,

    /// Maximum number of requests processed at once
    #[arg(long, env = "MAX_CONCURRENT_REQUESTS")]
    pub max_concurrent_requests: Option<usize>,

    /// Port to listen on, all interfaces
    #[arg(short, long, env = "SERVER_PORT")]
    pub port: Option<u16>,

    /// Per-request deadline in seconds
    #[arg(long, env = "REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Override the listen address; takes precedence over `--port`
    #[arg(long, env = "EARSHOT_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directives
    #[arg(long, default_value = "info", env = "EARSHOT_LOG")]
    pub log_filter: String,
}

impl Args {
    /// Layer flag and environment overrides on top of `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.whisper_url {
            config.stt.base_url = url.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.llm.base_url = url.clone();
        }
        if let Some(max) = self.max_concurrent_requests {
            config.pipeline.max_concurrent_requests = max;
        }
        if let Some(timeout) = self.request_timeout {
            config.pipeline.request_timeout = timeout;
        }

        if let Some(listen) = self.listen {
            config.server.listen_address = listen;
        } else if let Some(port) = self.port {
            config.server.listen_address.set_port(port);
        }
    }

    /// Load the configuration file, if any, and apply overrides
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        self.apply(&mut config);
        config.validate()?;

        Ok(config)
    }
}
