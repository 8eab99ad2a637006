use std::{sync::Arc, time::Instant};

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use earshot_telemetry::{Counter, Histogram, KeyValue, metrics};

/// Request count and latency instruments
pub struct HttpMetrics {
    duration: Histogram<f64>,
    count: Counter<u64>,
}

impl Default for HttpMetrics {
    fn default() -> Self {
        let meter = metrics::meter();

        Self {
            duration: meter
                .f64_histogram(metrics::HTTP_REQUEST_DURATION)
                .with_unit("s")
                .with_description("Duration of HTTP requests")
                .build(),
            count: meter
                .u64_counter(metrics::HTTP_REQUEST_COUNT)
                .with_description("Number of HTTP requests")
                .build(),
        }
    }
}

/// Log one line per request and record request metrics
///
/// Runs for every route, including rejected and failed requests.
pub async fn instrumentation_middleware(metrics: Arc<HttpMetrics>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    // Label metrics by route template to keep cardinality bounded
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |matched| matched.as_str().to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed = start.elapsed();

    tracing::info!(
        %method,
        path = %path,
        status,
        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "request completed"
    );

    let attributes = [
        KeyValue::new("http.request.method", method.to_string()),
        KeyValue::new("http.route", route),
        KeyValue::new("http.response.status_code", i64::from(status)),
    ];
    metrics::record_duration(&metrics.duration, start, &attributes);
    metrics.count.add(1, &attributes);

    response
}
