//! Mock inference backend for integration tests
//!
//! Implements `/api/generate` with non-streaming canned responses

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Body of a generate call as the mock saw it
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedGenerate {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// Mock inference service that returns predictable responses
pub struct MockOllama {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockOllamaState>,
}

struct MockOllamaState {
    request_count: AtomicU32,
    /// `None` means answer 200 with a generated response
    failure: Option<(StatusCode, String)>,
    response: String,
    delay: Duration,
    requests: Mutex<Vec<RecordedGenerate>>,
}

impl MockOllama {
    /// Start a mock that answers every prompt with `response`
    pub async fn start(response: &str) -> anyhow::Result<Self> {
        Self::start_inner(None, response.to_owned(), Duration::ZERO).await
    }

    /// Start a mock that answers every request with `status` and `body`
    pub async fn start_failing(status: u16, body: &str) -> anyhow::Result<Self> {
        let failure = (StatusCode::from_u16(status)?, body.to_owned());
        Self::start_inner(Some(failure), String::new(), Duration::ZERO).await
    }

    /// Start a mock that waits `delay` before answering
    pub async fn start_delayed(response: &str, delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(None, response.to_owned(), delay).await
    }

    async fn start_inner(
        failure: Option<(StatusCode, String)>,
        response: String,
        delay: Duration,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockOllamaState {
            request_count: AtomicU32::new(0),
            failure,
            response,
            delay,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/generate", routing::post(handle_generate))
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

    /// Base URL for configuring the inference client
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generate requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Every generate request received so far
    pub fn requests(&self) -> Vec<RecordedGenerate> {
        self.state.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for MockOllama {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(
    State(state): State<Arc<MockOllamaState>>,
    Json(request): Json<RecordedGenerate>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().expect("requests lock").push(request.clone());

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    if let Some((status, body)) = &state.failure {
        return (*status, body.clone()).into_response();
    }

    Json(serde_json::json!({
        "model": request.model,
        "created_at": "2024-01-01T00:00:00Z",
        "response": state.response,
        "done": true,
        "done_reason": "stop",
        "total_duration": 1_000_000,
        "eval_count": 12,
    }))
    .into_response()
}
