//! Mock transcription backend for integration tests
//!
//! Serves both the whisper-asr-webservice route (`/asr`) and the
//! OpenAI-compatible route (`/v1/audio/transcriptions`) with canned replies

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Multipart, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// One multipart upload as the mock saw it
#[derive(Debug, Clone, Default)]
pub struct RecordedUpload {
    pub route: &'static str,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub filename: Option<String>,
    pub file_bytes: usize,
    pub fields: Vec<(String, String)>,
}

/// Mock transcription service that returns predictable responses
pub struct MockWhisper {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockWhisperState>,
}

struct MockWhisperState {
    request_count: AtomicU32,
    status: StatusCode,
    body: String,
    delay: Duration,
    /// When set, each request waits for a permit before answering
    gate: Option<Arc<Semaphore>>,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl MockWhisper {
    /// Start a mock that transcribes everything as `text`
    pub async fn start(text: &str) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, transcript_body(text), Duration::ZERO, None).await
    }

    /// Start a mock that answers every request with `status` and `body`
    pub async fn start_failing(status: u16, body: &str) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::from_u16(status)?, body.to_owned(), Duration::ZERO, None).await
    }

    /// Start a mock that answers 200 with a body that is not a transcript
    pub async fn start_with_raw_body(body: &str) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, body.to_owned(), Duration::ZERO, None).await
    }

    /// Start a mock that waits `delay` before answering
    pub async fn start_delayed(text: &str, delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, transcript_body(text), delay, None).await
    }

    /// Start a mock that holds every request until [`Self::release`] is called
    pub async fn start_gated(text: &str) -> anyhow::Result<Self> {
        let gate = Arc::new(Semaphore::new(0));
        Self::start_inner(StatusCode::OK, transcript_body(text), Duration::ZERO, Some(gate)).await
    }

    async fn start_inner(
        status: StatusCode,
        body: String,
        delay: Duration,
        gate: Option<Arc<Semaphore>>,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockWhisperState {
            request_count: AtomicU32::new(0),
            status,
            body,
            delay,
            gate,
            uploads: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/asr", routing::post(handle_asr))
            .route("/v1/audio/transcriptions", routing::post(handle_openai))
            // Long recordings must reach the handler intact
            .layer(DefaultBodyLimit::disable())
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for the whisper-asr provider
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL for the OpenAI-compatible provider
    ///
    /// Includes `/v1` since the provider appends `/audio/transcriptions`
    pub fn openai_base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of transcription requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Let `n` held requests answer
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.state.gate {
            gate.add_permits(n);
        }
    }

    /// Every upload received so far
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.uploads.lock().expect("uploads lock").clone()
    }
}

impl Drop for MockWhisper {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn transcript_body(text: &str) -> String {
    serde_json::json!({
        "text": text,
        "segments": [{"id": 0, "start": 0.0, "end": 1.0, "text": text}],
        "language": "en",
    })
    .to_string()
}

async fn handle_asr(
    State(state): State<Arc<MockWhisperState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    respond(state, "asr", "audio_file", query, headers, multipart).await
}

async fn handle_openai(
    State(state): State<Arc<MockWhisperState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    respond(state, "openai", "file", query, headers, multipart).await
}

async fn respond(
    state: Arc<MockWhisperState>,
    route: &'static str,
    file_field: &'static str,
    query: Option<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    state.request_count.fetch_add(1, Ordering::SeqCst);

    let mut upload = RecordedUpload {
        route,
        query,
        authorization: headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        ..RecordedUpload::default()
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();

        if name == file_field {
            upload.filename = field.file_name().map(str::to_owned);
            upload.file_bytes = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        } else {
            let value = field.text().await.unwrap_or_default();
            upload.fields.push((name, value));
        }
    }

    state.uploads.lock().expect("uploads lock").push(upload);

    if let Some(gate) = &state.gate {
        gate.acquire().await.expect("gate open").forget();
    }

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
        .into_response()
}
