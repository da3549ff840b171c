use thiserror::Error;

use crate::bill::{BillId, BillIdError};
use crate::cache::CacheError;
use crate::upstream::UpstreamError;

/// Failures surfaced to callers of the synchronization engine.
///
/// The variants separate "no such bill" from "try again later" from an
/// internal fault. A failed summary is not an error here; it is reported
/// in-band on the bill view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Invalid bill id: {0}")]
    InvalidBillId(#[from] BillIdError),
    #[error("Bill not found: {id}")]
    UpstreamNotFound { id: BillId },
    #[error("Upstream rate limit exceeded, try again later")]
    UpstreamRateLimited,
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Cache store failure: {0}")]
    CacheStore(#[from] CacheError),
}

impl SyncError {
    /// Lifts a fetch failure for `id` into the caller-facing taxonomy.
    pub fn from_upstream(id: &BillId, error: UpstreamError) -> Self {
        match error {
            UpstreamError::NotFound => SyncError::UpstreamNotFound { id: id.clone() },
            UpstreamError::RateLimited => SyncError::UpstreamRateLimited,
            UpstreamError::Unavailable(reason) | UpstreamError::NotConfigured(reason) => {
                SyncError::UpstreamUnavailable(reason)
            }
        }
    }

    /// Transient failures may be answered with a stale cached record.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SyncError::UpstreamRateLimited | SyncError::UpstreamUnavailable(_)
        )
    }

    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::InvalidBillId(_) => "invalid_bill_id",
            SyncError::UpstreamNotFound { .. } => "upstream_not_found",
            SyncError::UpstreamRateLimited => "upstream_rate_limited",
            SyncError::UpstreamUnavailable(_) => "upstream_unavailable",
            SyncError::CacheStore(_) => "cache_store_failure",
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, SyncError>;
