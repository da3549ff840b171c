use thiserror::Error;

/// Errors raised by a cache store backend.
///
/// Any of these is fatal to the request that hit it: the engine never falls
/// back to a partial write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache store connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache store operation failed: {0}")]
    OperationFailed(String),
    #[error("Cached record is corrupt: {0}")]
    Serialization(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
