//! Pure mapping from engine errors to HTTP responses.

use super::SyncError;

/// Maps a [`SyncError`] to an HTTP status code.
///
/// - `InvalidBillId` -> 400 (Bad Request)
/// - `UpstreamNotFound` -> 404 (Not Found)
/// - `UpstreamRateLimited` -> 429 (Too Many Requests)
/// - `UpstreamUnavailable` -> 503 (Service Unavailable)
/// - `CacheStore` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use billwatch_core::sync::{sync_error_to_status_code, SyncError};
///
/// assert_eq!(sync_error_to_status_code(&SyncError::UpstreamRateLimited), 429);
/// ```
pub fn sync_error_to_status_code(error: &SyncError) -> u16 {
    match error {
        SyncError::InvalidBillId(_) => 400,
        SyncError::UpstreamNotFound { .. } => 404,
        SyncError::UpstreamRateLimited => 429,
        SyncError::UpstreamUnavailable(_) => 503,
        SyncError::CacheStore(_) => 500,
    }
}

/// Seconds a client should wait before retrying, for transient failures.
pub fn retry_after_seconds(error: &SyncError) -> Option<u64> {
    match error {
        SyncError::UpstreamRateLimited => Some(60),
        SyncError::UpstreamUnavailable(_) => Some(30),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{BillId, BillIdError};
    use crate::cache::CacheError;

    #[test]
    fn test_invalid_bill_id_maps_to_400() {
        let error = SyncError::InvalidBillId(BillIdError::TooLong);
        assert_eq!(sync_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let error = SyncError::UpstreamNotFound {
            id: BillId::parse("SB-1").unwrap(),
        };
        assert_eq!(sync_error_to_status_code(&error), 404);
        assert_eq!(retry_after_seconds(&error), None);
    }

    #[test]
    fn test_transient_errors_carry_retry_after() {
        let limited = SyncError::UpstreamRateLimited;
        let down = SyncError::UpstreamUnavailable("timeout".to_string());

        assert_eq!(sync_error_to_status_code(&limited), 429);
        assert_eq!(sync_error_to_status_code(&down), 503);
        assert_eq!(retry_after_seconds(&limited), Some(60));
        assert_eq!(retry_after_seconds(&down), Some(30));
    }

    #[test]
    fn test_cache_store_maps_to_500() {
        let error = SyncError::CacheStore(CacheError::ConnectionFailed("closed".to_string()));
        assert_eq!(sync_error_to_status_code(&error), 500);
    }
}
