//! Administrative invalidation requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bill::BillId;

use super::pattern_matches;

/// Which cached records an invalidation applies to.
///
/// Serialized with an internal `type` tag:
///
/// ```json
/// { "type": "bill", "id": "AB-123" }
/// { "type": "matching", "pattern": "AB-*" }
/// { "type": "expired", "older_than_seconds": 86400 }
/// { "type": "all" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvalidationScope {
    Bill { id: BillId },
    Matching { pattern: String },
    Expired { older_than_seconds: u64 },
    All,
}

impl InvalidationScope {
    /// Returns true if a record for `id` stamped at `stamped_at` falls in scope at `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use billwatch_core::bill::BillId;
    /// use billwatch_core::cache::InvalidationScope;
    /// use chrono::{Duration, Utc};
    ///
    /// let now = Utc::now();
    /// let id = BillId::parse("AB-123").unwrap();
    /// let scope = InvalidationScope::Expired { older_than_seconds: 60 };
    ///
    /// assert!(scope.matches(&id, now - Duration::seconds(61), now));
    /// assert!(!scope.matches(&id, now - Duration::seconds(10), now));
    /// ```
    pub fn matches(&self, id: &BillId, stamped_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            InvalidationScope::Bill { id: target } => target == id,
            InvalidationScope::Matching { pattern } => pattern_matches(pattern, id.as_str()),
            InvalidationScope::Expired { older_than_seconds } => {
                let older_than = i64::try_from(*older_than_seconds).unwrap_or(i64::MAX);
                now.signed_duration_since(stamped_at).num_seconds() >= older_than
            }
            InvalidationScope::All => true,
        }
    }
}

/// An administrator's request to drop cached records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationRequest {
    pub scope: InvalidationScope,
    /// Also drop summaries of matched bills. Off by default since summaries
    /// stay valid for unchanged content.
    #[serde(default)]
    pub include_summaries: bool,
}

impl InvalidationRequest {
    pub fn bill(id: BillId) -> Self {
        Self {
            scope: InvalidationScope::Bill { id },
            include_summaries: false,
        }
    }

    pub fn all() -> Self {
        Self {
            scope: InvalidationScope::All,
            include_summaries: true,
        }
    }

    pub fn expired(older_than_seconds: u64) -> Self {
        Self {
            scope: InvalidationScope::Expired { older_than_seconds },
            include_summaries: false,
        }
    }

    pub fn with_summaries(mut self) -> Self {
        self.include_summaries = true;
        self
    }
}

/// What an invalidation sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationReport {
    pub bills_removed: usize,
    pub summaries_removed: usize,
    pub not_found_cleared: usize,
}
