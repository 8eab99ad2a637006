use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// Settings governing the `/process` pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Maximum number of pipelines running at once; further requests get 503
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Deadline in seconds covering staging, transcription and inference
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Largest accepted request body in bytes, unlimited when unset
    #[serde(default)]
    pub max_upload_size: Option<usize>,
    /// Directory for staged uploads, defaults to the system temp dir
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
}

impl PipelineConfig {
    /// Per-request deadline as a [`Duration`]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Resolved staging directory
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent_requests(),
            request_timeout: default_request_timeout(),
            max_upload_size: None,
            staging_dir: None,
        }
    }
}

const fn default_max_concurrent_requests() -> usize {
    50
}

const fn default_request_timeout() -> u64 {
    300
}
