use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::from_toml(&raw)?;

        tracing::debug!(path = %path.display(), "configuration file loaded");

        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Called again after command-line and environment overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is zero or a default is unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_pipeline()?;
        self.validate_llm()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_pipeline(&self) -> anyhow::Result<()> {
        let pipeline = &self.pipeline;

        if pipeline.max_concurrent_requests == 0 {
            anyhow::bail!("pipeline.max_concurrent_requests must be greater than 0");
        }

        if pipeline.request_timeout == 0 {
            anyhow::bail!("pipeline.request_timeout must be greater than 0");
        }

        if pipeline.max_upload_size == Some(0) {
            anyhow::bail!("pipeline.max_upload_size must be greater than 0");
        }

        Ok(())
    }

    fn validate_llm(&self) -> anyhow::Result<()> {
        if self.llm.default_model.trim().is_empty() {
            anyhow::bail!("llm.default_model must not be empty");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&telemetry.tracing.sampling_rate) {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0");
        }

        Ok(())
    }
}
