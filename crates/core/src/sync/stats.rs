use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::StoreSnapshot;
use crate::freshness::{age, Freshness, FreshnessPolicy};

/// Read-only cache introspection for administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub bill_entries: usize,
    pub summary_entries: usize,
    pub fresh_bills: usize,
    pub stale_bills: usize,
    /// Age of the oldest cached bill; `None` when the cache is empty.
    pub oldest_entry_age_seconds: Option<u64>,
    pub in_flight_bill_fetches: usize,
    pub in_flight_summary_fetches: usize,
    pub not_found_entries: usize,
}

impl CacheStats {
    /// Computes the store-derived fields. In-flight and negative-cache counts
    /// are left at zero for the engine to fill in.
    pub fn from_snapshot(
        snapshot: &StoreSnapshot,
        policy: &FreshnessPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let fresh_bills = snapshot
            .bill_fetched_at
            .iter()
            .filter(|fetched_at| policy.bill(Some(**fetched_at), now) == Freshness::ServeCached)
            .count();

        let oldest_entry_age_seconds = snapshot
            .bill_fetched_at
            .iter()
            .min()
            .map(|oldest| age(*oldest, now).as_secs());

        Self {
            bill_entries: snapshot.bill_fetched_at.len(),
            summary_entries: snapshot.summary_entries,
            fresh_bills,
            stale_bills: snapshot.bill_fetched_at.len() - fresh_bills,
            oldest_entry_age_seconds,
            ..Self::default()
        }
    }
}
