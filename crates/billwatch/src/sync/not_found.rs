//! Short-lived memory of bills the upstream reported as missing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use billwatch_core::bill::BillId;
use billwatch_core::cache::InvalidationScope;
use billwatch_core::freshness::{Freshness, FreshnessPolicy};

/// Negative cache for `UpstreamNotFound`, bounded by the not-found TTL.
#[derive(Clone, Default)]
pub struct NotFoundCache {
    entries: Arc<Mutex<HashMap<BillId, DateTime<Utc>>>>,
}

impl NotFoundCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, id: &BillId, at: DateTime<Utc>) {
        self.entries.lock().insert(id.clone(), at);
    }

    pub fn forget(&self, id: &BillId) {
        self.entries.lock().remove(id);
    }

    /// Returns true while a not-found answer for `id` is still within its TTL.
    /// Expired entries are dropped on the way.
    pub fn contains(&self, id: &BillId, policy: &FreshnessPolicy, now: DateTime<Utc>) -> bool {
        let mut entries = self.entries.lock();
        let fresh = entries
            .get(id)
            .map(|at| policy.not_found(Some(*at), now) == Freshness::ServeCached);
        match fresh {
            Some(true) => true,
            Some(false) => {
                entries.remove(id);
                false
            }
            None => false,
        }
    }

    /// Drops entries matching `scope`, returning how many were removed.
    pub fn clear_matching(&self, scope: &InvalidationScope, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|id, at| !scope.matches(id, *at, now));
        before - entries.len()
    }

    /// Prunes expired entries and returns how many remain.
    pub fn live_count(&self, policy: &FreshnessPolicy, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        entries.retain(|_, at| policy.not_found(Some(*at), now) == Freshness::ServeCached);
        entries.len()
    }
}
