use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    routing::any,
};
use earshot_admission::CapacityLimiter;
use earshot_config::Config;
use earshot_llm::OllamaClient;
use earshot_telemetry::{Counter, Histogram, KeyValue, metrics};
use http::Method;
use serde::{Deserialize, Serialize};
use stt::Transcriber;
use tokio::time::Instant;

use crate::{
    error::ProcessError,
    staging::{StagedAudio, StagingArea, Upload},
};

/// Prefix of the `response` text when inference fails after transcription
pub const INFERENCE_FAILURE_PREFIX: &str = "Ollama processing failed: ";

/// Body of a successful or partially successful `/process` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResponse {
    pub transcription: String,
    pub response: String,
    pub process_time_ms: u64,
    pub model: String,
}

/// A staged upload with its model and prompt resolved
struct PipelineRequest {
    audio: StagedAudio,
    model: String,
    prompt: String,
}

/// How an admitted request that produced a transcript ended
#[derive(Debug, Clone, Copy)]
enum Outcome {
    Completed,
    InferenceFailed,
}

impl Outcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InferenceFailed => "inference_failed",
        }
    }
}

/// Transcribe-then-infer orchestrator behind `/process`
pub struct Pipeline {
    limiter: CapacityLimiter,
    staging: StagingArea,
    transcriber: Transcriber,
    llm: OllamaClient,
    request_timeout: Duration,
    default_model: String,
    default_prompt: String,
    metrics: PipelineMetrics,
}

impl Pipeline {
    /// Build the pipeline and its upstream clients from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the limiter or either upstream client cannot be
    /// constructed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let limiter = earshot_admission::create_capacity_limiter(config.pipeline.max_concurrent_requests)?;
        let transcriber = stt::build_transcriber(&config.stt)?;
        let llm = earshot_llm::build_client(&config.llm)?;

        Ok(Self {
            limiter,
            staging: StagingArea::new(config.pipeline.staging_dir()),
            transcriber,
            llm,
            request_timeout: config.pipeline.request_timeout(),
            default_model: config.llm.default_model.clone(),
            default_prompt: config.llm.default_prompt.clone(),
            metrics: PipelineMetrics::new(),
        })
    }

    /// Run one request through admission, staging, transcription and inference
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] for every terminal failure. An inference
    /// failure is not one of them: the transcript is still returned.
    pub async fn run(
        &self,
        method: &Method,
        form: Result<Multipart, MultipartRejection>,
    ) -> Result<CombinedResponse, ProcessError> {
        let Ok(_permit) = self.limiter.try_acquire() else {
            tracing::warn!(capacity = self.limiter.capacity(), "rejecting request, pipeline at capacity");
            self.metrics.rejected.add(1, &[]);
            return Err(ProcessError::CapacityExceeded);
        };

        let admitted_at = Instant::now();

        let result = self.execute(method, form, admitted_at).await;

        let outcome = match &result {
            Ok((_, outcome)) => outcome.as_str(),
            Err(e) => {
                tracing::warn!(kind = e.kind(), "pipeline failed: {e}");
                e.kind()
            }
        };
        self.metrics
            .outcomes
            .add(1, &[KeyValue::new("outcome", outcome)]);

        result.map(|(response, _)| response)
    }

    async fn execute(
        &self,
        method: &Method,
        form: Result<Multipart, MultipartRejection>,
        admitted_at: Instant,
    ) -> Result<(CombinedResponse, Outcome), ProcessError> {
        let deadline = admitted_at + self.request_timeout;

        if *method != Method::POST {
            return Err(ProcessError::MethodNotAllowed);
        }

        let form = form.map_err(|e| ProcessError::MalformedRequest(format!("Failed to parse form: {e}")))?;

        let stage_start = std::time::Instant::now();
        let upload = tokio::time::timeout_at(deadline, self.staging.receive(form))
            .await
            .map_err(|_| ProcessError::Staging("Failed to stage upload: request deadline exceeded".to_string()))??;
        self.metrics.record_stage("staging", stage_start);

        let request = self.resolve(upload);

        let stage_start = std::time::Instant::now();
        let transcription = self
            .transcriber
            .transcribe(request.audio.file(), deadline)
            .await
            .map_err(ProcessError::Transcription)?;
        self.metrics.record_stage("transcription", stage_start);

        tracing::debug!(
            chars = transcription.text.len(),
            language = ?transcription.language,
            "transcription complete"
        );

        let stage_start = std::time::Instant::now();
        let (response, outcome) = match self
            .llm
            .generate(&request.model, &request.prompt, &transcription.text, deadline)
            .await
        {
            Ok(generated) => {
                self.metrics.record_stage("inference", stage_start);
                (generated.response, Outcome::Completed)
            }
            Err(e) => {
                tracing::warn!(model = %request.model, "inference failed, returning transcription only: {e}");
                (format!("{INFERENCE_FAILURE_PREFIX}{e}"), Outcome::InferenceFailed)
            }
        };

        let process_time_ms = u64::try_from(admitted_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            model = %request.model,
            process_time_ms,
            outcome = outcome.as_str(),
            "pipeline finished"
        );

        Ok((
            CombinedResponse {
                transcription: transcription.text,
                response,
                process_time_ms,
                model: request.model,
            },
            outcome,
        ))
    }

    /// Apply model and prompt defaults
    fn resolve(&self, upload: Upload) -> PipelineRequest {
        let Upload { audio, model, prompt } = upload;

        PipelineRequest {
            audio,
            model: or_default(model, &self.default_model),
            prompt: or_default(prompt, &self.default_prompt),
        }
    }
}

/// A blank form value counts as absent
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Handle `/process` for every method; non-POST is rejected after admission
async fn process_handler(
    State(pipeline): State<Arc<Pipeline>>,
    method: Method,
    form: Result<Multipart, MultipartRejection>,
) -> Result<Json<CombinedResponse>, ProcessError> {
    pipeline.run(&method, form).await.map(Json)
}

/// Create the endpoint router for the pipeline
///
/// Uploads stream to disk, so the body is unbounded unless a limit is set.
pub fn endpoint_router(max_upload_size: Option<usize>) -> Router<Arc<Pipeline>> {
    let body_limit = match max_upload_size {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/process", any(process_handler))
        .layer(body_limit)
}

struct PipelineMetrics {
    rejected: Counter<u64>,
    outcomes: Counter<u64>,
    stage_duration: Histogram<f64>,
}

impl PipelineMetrics {
    fn new() -> Self {
        let meter = metrics::meter();

        Self {
            rejected: meter
                .u64_counter(metrics::PIPELINE_ADMISSION_REJECTED)
                .with_description("Requests refused because the pipeline was at capacity")
                .build(),
            outcomes: meter
                .u64_counter(metrics::PIPELINE_OUTCOME_COUNT)
                .with_description("Admitted requests by terminal state")
                .build(),
            stage_duration: meter
                .f64_histogram(metrics::PIPELINE_STAGE_DURATION)
                .with_unit("s")
                .with_description("Duration of successful pipeline stages")
                .build(),
        }
    }

    fn record_stage(&self, stage: &'static str, start: std::time::Instant) {
        metrics::record_duration(&self.stage_duration, start, &[KeyValue::new("stage", stage)]);
    }
}
