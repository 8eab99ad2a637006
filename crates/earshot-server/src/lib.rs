//! HTTP surface of the earshot bridge
//!
//! Routes `/process` through the transcription and inference pipeline and
//! serves a health check that never touches the capacity limiter.

mod error;
mod health;
mod instrumentation;
mod panic;
mod pipeline;
mod staging;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use earshot_config::Config;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::ProcessError;
pub use pipeline::{CombinedResponse, INFERENCE_FAILURE_PREFIX, Pipeline};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity limiter or either upstream client
    /// cannot be constructed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let pipeline = Arc::new(Pipeline::new(config)?);

        tracing::info!(
            stt_provider = ?config.stt.provider_type,
            whisper_url = %config.stt.base_url,
            ollama_url = %config.llm.base_url,
            max_concurrent_requests = config.pipeline.max_concurrent_requests,
            request_timeout_secs = config.pipeline.request_timeout,
            "pipeline configured"
        );

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Pipeline route
        app = app.merge(pipeline::endpoint_router(config.pipeline.max_upload_size).with_state(pipeline));

        Ok(Self {
            router: with_middleware(app),
            listen_address: config.server.listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered. In-flight requests
    /// are allowed to finish before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

/// Apply middleware layers (innermost first)
fn with_middleware(mut app: Router) -> Router {
    // Panic isolation
    app = app.layer(CatchPanicLayer::custom(panic::panic_response));

    // Request log and metrics
    let metrics = Arc::new(instrumentation::HttpMetrics::default());
    app = app.layer(axum::middleware::from_fn(move |req, next| {
        let metrics = Arc::clone(&metrics);
        async move { instrumentation::instrumentation_middleware(metrics, req, next).await }
    }));

    // Tracing
    app.layer(TraceLayer::new_for_http())
}
