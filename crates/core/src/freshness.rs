//! Freshness decisions for cached bills and summaries.
//!
//! Pure functions only: the same inputs always yield the same decision, so
//! every branch is testable without a clock, network or database.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What to do with a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// The cached record is younger than its TTL.
    ServeCached,
    /// A record exists but has reached its TTL.
    Refresh,
    /// Nothing is cached.
    Missing,
}

impl Freshness {
    /// Returns true if the caller has to go upstream.
    pub fn needs_fetch(self) -> bool {
        !matches!(self, Freshness::ServeCached)
    }
}

/// Decides whether a record stamped at `stamped_at` may be served at `now`.
///
/// A record is fresh while `now - stamped_at < ttl`. Timestamps in the future
/// (clock skew between writers) count as age zero.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use billwatch_core::freshness::{decide, Freshness};
/// use chrono::{TimeZone, Utc};
///
/// let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let ttl = Duration::from_secs(60);
///
/// assert_eq!(decide(None, t0, ttl), Freshness::Missing);
/// assert_eq!(decide(Some(t0), t0 + chrono::Duration::seconds(30), ttl), Freshness::ServeCached);
/// assert_eq!(decide(Some(t0), t0 + chrono::Duration::seconds(60), ttl), Freshness::Refresh);
/// ```
pub fn decide(stamped_at: Option<DateTime<Utc>>, now: DateTime<Utc>, ttl: Duration) -> Freshness {
    let Some(stamped_at) = stamped_at else {
        return Freshness::Missing;
    };

    if age(stamped_at, now) < ttl {
        Freshness::ServeCached
    } else {
        Freshness::Refresh
    }
}

/// Age of a record at `now`, saturating at zero.
pub fn age(stamped_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - stamped_at).to_std().unwrap_or(Duration::ZERO)
}

/// TTLs per entity type.
///
/// Summaries are expensive to regenerate and tied to content by hash, so they
/// usually live longer than bill status snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub bill_ttl: Duration,
    pub summary_ttl: Duration,
    /// How long an upstream "no such bill" answer is remembered.
    pub not_found_ttl: Duration,
}

impl FreshnessPolicy {
    pub fn bill(&self, fetched_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Freshness {
        decide(fetched_at, now, self.bill_ttl)
    }

    pub fn summary(&self, generated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Freshness {
        decide(generated_at, now, self.summary_ttl)
    }

    pub fn not_found(&self, recorded_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Freshness {
        decide(recorded_at, now, self.not_found_ttl)
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            bill_ttl: Duration::from_secs(24 * 60 * 60),
            summary_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            not_found_ttl: Duration::from_secs(5 * 60),
        }
    }
}
