//! Pipeline error types

use thiserror::Error;

/// Errors raised by the distribution calculator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// Denominator or numerator is missing, zero, or not numeric
    #[error("Invalid distribution input: {0}")]
    InvalidInput(String),
}

/// Errors reported by an upstream data source.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The named resource does not exist upstream
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The upstream answered with something that is not a row set
    #[error("Malformed upstream payload: {0}")]
    Malformed(String),

    /// Transport-level failure (I/O, network, ...)
    #[error("Upstream I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Generic upstream error
    #[error("Upstream error: {0}")]
    Other(String),
}

/// Top-level pipeline errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// One fetch of a fan-out batch failed; the whole batch is abandoned
    #[error("Upstream fetch failed for {resource}: {source}")]
    UpstreamFetchFailed {
        resource: String,
        #[source]
        source: UpstreamError,
    },

    /// A fetched row could not be decoded into the expected shape
    #[error("Failed to decode {resource} row: {message}")]
    Decode { resource: String, message: String },
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
