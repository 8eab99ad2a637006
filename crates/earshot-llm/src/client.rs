use earshot_config::LlmConfig;
use reqwest::Client;
use tokio::time::Instant;
use url::Url;

use crate::{
    error::LlmError,
    http_client::http_client,
    protocol::{GenerateRequest, GenerateResponse, compose_prompt},
};

/// Client for an Ollama-compatible generation endpoint
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: Url,
}

impl OllamaClient {
    /// Create from inference configuration
    pub fn new(config: &LlmConfig) -> crate::error::Result<Self> {
        if config.base_url.cannot_be_a_base() {
            return Err(LlmError::Config(format!(
                "inference base URL '{}' cannot be used as a base",
                config.base_url
            )));
        }

        Ok(Self {
            client: http_client(),
            base_url: config.base_url.clone(),
        })
    }

    /// Build the generation URL
    fn generate_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/api/generate")
    }

    /// Run `prompt` over `transcript` with `model`
    ///
    /// The request is abandoned once `deadline` passes, in which case
    /// [`LlmError::DeadlineExceeded`] is returned.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        transcript: &str,
        deadline: Instant,
    ) -> crate::error::Result<GenerateResponse> {
        let prompt = compose_prompt(prompt, transcript);
        let request = GenerateRequest {
            model,
            prompt: &prompt,
            stream: false,
        };

        tokio::time::timeout_at(deadline, self.send(&request)).await.map_err(|_| {
            tracing::warn!(model, "inference deadline exceeded");
            LlmError::DeadlineExceeded
        })?
    }

    async fn send(&self, request: &GenerateRequest<'_>) -> crate::error::Result<GenerateResponse> {
        tracing::debug!(model = request.model, prompt_len = request.prompt.len(), "sending generate request");

        let response = self
            .client
            .post(self.generate_url())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {e}");
                LlmError::Transport(e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Ollama API error ({status}): {body}");

            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to read response body: {e}")))?;

        let generated: GenerateResponse = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {e}");
            LlmError::Decode(e.to_string())
        })?;

        if !generated.done {
            tracing::warn!(model = request.model, "Ollama response not marked done");
        }

        tracing::debug!(
            model = %generated.model,
            done_reason = ?generated.done_reason,
            eval_count = ?generated.eval_count,
            total_duration_ns = ?generated.total_duration,
            "generation complete"
        );

        Ok(generated)
    }
}
