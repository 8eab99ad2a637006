use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

use crate::error::AdmissionError;

/// Counting gate over a fixed number of permits
///
/// Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct CapacityLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Token held for the lifetime of one admitted request
///
/// Dropping the permit returns it to the pool, so it is released exactly once
/// whichever way the request ends, unwinding included.
#[derive(Debug)]
#[must_use = "the request is only admitted while the permit is held"]
pub struct CapacityPermit {
    _permit: OwnedSemaphorePermit,
}

impl CapacityLimiter {
    /// Create a limiter with `capacity` permits
    pub fn new(capacity: usize) -> Result<Self, AdmissionError> {
        if capacity == 0 {
            return Err(AdmissionError::Config("capacity must be greater than 0".to_string()));
        }

        if capacity > Semaphore::MAX_PERMITS {
            return Err(AdmissionError::Config(format!(
                "capacity {capacity} exceeds the maximum of {}",
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Take a permit without waiting
    ///
    /// Returns [`AdmissionError::Exceeded`] when all permits are held.
    pub fn try_acquire(&self) -> Result<CapacityPermit, AdmissionError> {
        match Arc::clone(&self.semaphore).try_acquire_owned() {
            Ok(permit) => Ok(CapacityPermit { _permit: permit }),
            // The semaphore is never closed, so only `NoPermits` occurs in practice
            Err(TryAcquireError::NoPermits | TryAcquireError::Closed) => {
                tracing::debug!(capacity = self.capacity, "admission refused");
                Err(AdmissionError::Exceeded {
                    capacity: self.capacity,
                })
            }
        }
    }

    /// Size of the permit pool
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }
}
