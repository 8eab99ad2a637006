//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::metrics::{Histogram, Meter};

/// Meter shared by every instrument the bridge records
///
/// Falls back to a no-op meter when no exporter was installed.
pub fn meter() -> Meter {
    opentelemetry::global::meter("earshot")
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    let duration = start.elapsed().as_secs_f64();
    histogram.record(duration, attributes);
}

// HTTP metric names
pub const HTTP_REQUEST_DURATION: &str = "http.server.request.duration";
pub const HTTP_REQUEST_COUNT: &str = "http.server.request.count";

// Pipeline metric names
pub const PIPELINE_ADMISSION_REJECTED: &str = "pipeline.admission.rejected";
pub const PIPELINE_STAGE_DURATION: &str = "pipeline.stage.duration";
pub const PIPELINE_OUTCOME_COUNT: &str = "pipeline.outcome.count";
