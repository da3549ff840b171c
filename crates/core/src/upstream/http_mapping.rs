//! Pure mapping from upstream HTTP status codes to typed failures.

use super::{SummaryError, UpstreamError};

/// Maps a legislative API response status to a failure.
///
/// Returns `None` for success codes.
///
/// # Examples
///
/// ```
/// use billwatch_core::upstream::{bill_failure_from_status, UpstreamError};
///
/// assert_eq!(bill_failure_from_status(200), None);
/// assert_eq!(bill_failure_from_status(404), Some(UpstreamError::NotFound));
/// assert_eq!(bill_failure_from_status(429), Some(UpstreamError::RateLimited));
/// ```
pub fn bill_failure_from_status(status: u16) -> Option<UpstreamError> {
    match status {
        200..=299 => None,
        404 => Some(UpstreamError::NotFound),
        429 => Some(UpstreamError::RateLimited),
        401 | 403 => Some(UpstreamError::Unavailable(format!(
            "upstream rejected credentials (HTTP {status})"
        ))),
        _ => Some(UpstreamError::Unavailable(format!("HTTP {status}"))),
    }
}

/// Maps a model provider response status to a failure.
///
/// A 400 means the provider refused the input itself; everything else is
/// treated as the model being unavailable.
pub fn summary_failure_from_status(status: u16) -> Option<SummaryError> {
    match status {
        200..=299 => None,
        400 | 413 => Some(SummaryError::InvalidInput(format!(
            "model rejected input (HTTP {status})"
        ))),
        _ => Some(SummaryError::ModelUnavailable(format!("HTTP {status}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_success_codes() {
        assert_eq!(bill_failure_from_status(200), None);
        assert_eq!(bill_failure_from_status(204), None);
    }

    #[test]
    fn test_bill_not_found_is_terminal() {
        let error = bill_failure_from_status(404).unwrap();
        assert_eq!(error, UpstreamError::NotFound);
        assert!(!error.is_transient());
    }

    #[test]
    fn test_bill_server_errors_are_unavailable() {
        for status in [500, 502, 503, 504] {
            assert!(matches!(
                bill_failure_from_status(status),
                Some(UpstreamError::Unavailable(_))
            ));
        }
    }

    #[test]
    fn test_bill_auth_errors_are_unavailable() {
        assert!(matches!(
            bill_failure_from_status(401),
            Some(UpstreamError::Unavailable(msg)) if msg.contains("credentials")
        ));
    }

    #[test]
    fn test_summary_mapping() {
        assert_eq!(summary_failure_from_status(200), None);
        assert!(matches!(
            summary_failure_from_status(400),
            Some(SummaryError::InvalidInput(_))
        ));
        assert!(matches!(
            summary_failure_from_status(429),
            Some(SummaryError::ModelUnavailable(_))
        ));
        assert!(matches!(
            summary_failure_from_status(503),
            Some(SummaryError::ModelUnavailable(_))
        ));
    }
}
