use thiserror::Error;

/// Failure of a single legislative API call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Bill not found upstream")]
    NotFound,
    #[error("Upstream rate limit exceeded")]
    RateLimited,
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),
    /// The client cannot make the call at all, e.g. a missing API key.
    #[error("Upstream client not configured: {0}")]
    NotConfigured(String),
}

impl UpstreamError {
    /// Transient failures are worth retrying; `NotFound` and `NotConfigured`
    /// are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, UpstreamError::RateLimited | UpstreamError::Unavailable(_))
    }
}

/// Failure of a single summarization call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Summary model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Invalid summary input: {0}")]
    InvalidInput(String),
    #[error("Summary model not configured: {0}")]
    NotConfigured(String),
}

impl SummaryError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SummaryError::ModelUnavailable(_))
    }
}

/// Result type for upstream bill fetches.
pub type Result<T> = std::result::Result<T, UpstreamError>;
