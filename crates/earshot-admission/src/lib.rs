#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Admission control for concurrently running pipelines
//!
//! A fixed pool of permits bounds how many requests may be in flight. Callers
//! that find the pool empty are turned away immediately; nothing waits.

mod error;
mod limiter;

pub use error::AdmissionError;
pub use limiter::{CapacityLimiter, CapacityPermit};

/// Create a capacity limiter holding `capacity` permits
pub fn create_capacity_limiter(capacity: usize) -> Result<CapacityLimiter, AdmissionError> {
    CapacityLimiter::new(capacity)
}
