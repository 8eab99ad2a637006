use thiserror::Error;

/// Admission control errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    /// Every permit is currently held
    #[error("capacity of {capacity} concurrent requests exceeded")]
    Exceeded {
        /// Size of the permit pool
        capacity: usize,
    },

    /// The limiter was constructed with an unusable size
    #[error("admission configuration error: {0}")]
    Config(String),
}
