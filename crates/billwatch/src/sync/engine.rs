//! The synchronization engine.
//!
//! Serves bills and summaries from the Cache Store while they are fresh and
//! goes upstream otherwise, with at most one outstanding upstream fetch per
//! bill id (and per bill version for summaries). Fetches run in detached
//! tasks, so a caller that gives up never cancels work other callers are
//! waiting on.

use std::sync::Arc;
use std::time::Duration;

use billwatch_core::bill::{
    parse_bill_payload, BillId, BillRecord, BillView, SourceHash, SummaryRecord,
};
use billwatch_core::cache::{BillStore, CacheError, InvalidationReport, InvalidationRequest};
use billwatch_core::clock::{Clock, SystemClock};
use billwatch_core::freshness::FreshnessPolicy;
use billwatch_core::retry::RetryPolicy;
use billwatch_core::sync::{CacheStats, Result, SyncError};
use billwatch_core::upstream::{BillSource, SummaryError, Summarizer};

use super::not_found::NotFoundCache;
use super::retry::call_with_retry;
use super::ticket::{Ticket, TicketTable};

/// Tunables the engine owns.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub freshness: FreshnessPolicy,
    pub retry: RetryPolicy,
    /// Bound on every single upstream attempt.
    pub upstream_timeout: Duration,
    /// How long a bill is kept after it was fetched. Past the bill TTL a
    /// record is still the stale fallback for failed refreshes, so this is
    /// never shorter than the TTL.
    pub retention: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            freshness: FreshnessPolicy::default(),
            retry: RetryPolicy::default(),
            upstream_timeout: Duration::from_secs(30),
            retention: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

/// Why a summary ticket resolved without a summary.
#[derive(Debug, Clone)]
enum SummaryFailure {
    Model(SummaryError),
    Store(CacheError),
}

type SummaryKey = (BillId, SourceHash);

/// Cache-fronted access to bills and their summaries.
///
/// Cheap to clone; clones share the store, the ticket tables and the
/// negative cache.
#[derive(Clone)]
pub struct SyncEngine {
    store: Arc<dyn BillStore>,
    source: Arc<dyn BillSource>,
    summarizer: Arc<dyn Summarizer>,
    clock: Arc<dyn Clock>,
    settings: Arc<EngineSettings>,
    bill_tickets: TicketTable<BillId, Result<BillRecord>>,
    summary_tickets: TicketTable<SummaryKey, std::result::Result<SummaryRecord, SummaryFailure>>,
    not_found: NotFoundCache,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn BillStore>,
        source: Arc<dyn BillSource>,
        summarizer: Arc<dyn Summarizer>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            source,
            summarizer,
            clock: Arc::new(SystemClock),
            settings: Arc::new(settings),
            bill_tickets: TicketTable::new(),
            summary_tickets: TicketTable::new(),
            not_found: NotFoundCache::new(),
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Parses `raw` as a bill id and looks the bill up.
    pub async fn lookup(&self, raw: &str, want_summary: bool) -> Result<BillView> {
        let id = BillId::parse(raw)?;
        self.get_bill(&id, want_summary).await
    }

    /// Returns the bill, and its summary when `want_summary` is set.
    ///
    /// A failed summary never fails the call; it is reported through
    /// [`BillView::summary_unavailable`].
    pub async fn get_bill(&self, id: &BillId, want_summary: bool) -> Result<BillView> {
        let (bill, stale) = self.resolve_bill(id).await?;

        if !want_summary {
            return Ok(BillView {
                stale,
                ..BillView::bill_only(bill)
            });
        }

        let (summary, summary_unavailable) = self.resolve_summary(&bill).await?;
        Ok(BillView {
            bill,
            summary,
            summary_unavailable,
            stale,
        })
    }

    /// Drops the records `request` matches, along with matching not-found
    /// entries. In-flight fetches are left to complete.
    pub async fn invalidate(&self, request: &InvalidationRequest) -> Result<InvalidationReport> {
        let now = self.clock.now();
        let mut report = self.store.sweep(request, now).await?;
        report.not_found_cleared = self.not_found.clear_matching(&request.scope, now);

        tracing::info!(
            scope = ?request.scope,
            include_summaries = request.include_summaries,
            bills_removed = report.bills_removed,
            summaries_removed = report.summaries_removed,
            not_found_cleared = report.not_found_cleared,
            "Cache invalidated"
        );
        Ok(report)
    }

    /// Removes bills older than the retention period.
    pub async fn sweep_expired(&self) -> Result<InvalidationReport> {
        let retention = self.settings.retention.max(self.settings.freshness.bill_ttl);
        self.invalidate(&InvalidationRequest::expired(retention.as_secs())).await
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        let now = self.clock.now();
        let policy = &self.settings.freshness;
        let snapshot = self.store.snapshot().await?;

        Ok(CacheStats {
            in_flight_bill_fetches: self.bill_tickets.len(),
            in_flight_summary_fetches: self.summary_tickets.len(),
            not_found_entries: self.not_found.live_count(policy, now),
            ..CacheStats::from_snapshot(&snapshot, policy, now)
        })
    }

    /// Returns the bill and whether it is a stale fallback.
    async fn resolve_bill(&self, id: &BillId) -> Result<(BillRecord, bool)> {
        let now = self.clock.now();
        let cached = self.store.get_bill(id).await?;
        let freshness = self
            .settings
            .freshness
            .bill(cached.as_ref().map(|bill| bill.fetched_at), now);

        if !freshness.needs_fetch() {
            if let Some(bill) = &cached {
                tracing::trace!(bill_id = %id, "Cache hit for bill");
                return Ok((bill.clone(), false));
            }
        }

        if self.not_found.contains(id, &self.settings.freshness, now) {
            tracing::trace!(bill_id = %id, "Bill remembered as not found");
            return Err(SyncError::UpstreamNotFound { id: id.clone() });
        }

        tracing::trace!(bill_id = %id, ?freshness, "Cache miss for bill");
        match self.fetch_bill(id).await {
            Ok(bill) => Ok((bill, false)),
            Err(err) if err.is_transient() => match cached {
                Some(bill) => {
                    tracing::warn!(
                        bill_id = %id,
                        error = %err,
                        fetched_at = %bill.fetched_at,
                        "Refresh failed, serving stale bill"
                    );
                    Ok((bill, true))
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Joins or starts the single fetch for `id` and waits for its outcome.
    async fn fetch_bill(&self, id: &BillId) -> Result<BillRecord> {
        let waiter = match self.bill_tickets.join(id.clone()) {
            Ticket::Waiter(waiter) => {
                tracing::trace!(bill_id = %id, "Attached to in-flight bill fetch");
                waiter
            }
            Ticket::Owner(owner) => {
                let waiter = owner.waiter();
                let engine = self.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    let outcome = engine.refresh_bill(&id).await;
                    owner.resolve(outcome);
                });
                waiter
            }
        };

        waiter.outcome().await.map_err(|_| {
            SyncError::UpstreamUnavailable("bill fetch was abandoned".to_string())
        })?
    }

    /// Ticket owner's work: fetch, parse, store.
    async fn refresh_bill(&self, id: &BillId) -> Result<BillRecord> {
        // A ticket that resolved just before ours may already have stored a
        // fresh copy.
        if let Some(bill) = self.store.get_bill(id).await? {
            let freshness = self
                .settings
                .freshness
                .bill(Some(bill.fetched_at), self.clock.now());
            if !freshness.needs_fetch() {
                return Ok(bill);
            }
        }

        let fetched = call_with_retry(
            &self.settings.retry,
            self.settings.upstream_timeout,
            "fetch_bill",
            || self.source.fetch_bill(id),
        )
        .await;

        let payload = match fetched {
            Ok(payload) => payload,
            Err(err) => {
                let err = SyncError::from_upstream(id, err);
                if let SyncError::UpstreamNotFound { .. } = err {
                    tracing::debug!(bill_id = %id, "Bill not found upstream");
                    self.not_found.record(id, self.clock.now());
                } else {
                    tracing::error!(bill_id = %id, error = %err, "Bill fetch failed");
                }
                return Err(err);
            }
        };

        let bill = parse_bill_payload(id, &payload, self.clock.now())
            .map_err(|err| SyncError::UpstreamUnavailable(err.to_string()))?;

        if let Err(err) = self.store.put_bill(&bill).await {
            tracing::error!(bill_id = %id, error = %err, "Failed to store bill");
            return Err(err.into());
        }
        self.not_found.forget(id);

        tracing::debug!(bill_id = %id, source_hash = %bill.source_hash, "Bill fetched");
        Ok(bill)
    }

    /// Returns the summary for this bill version and whether it is unavailable.
    async fn resolve_summary(&self, bill: &BillRecord) -> Result<(Option<SummaryRecord>, bool)> {
        let cached = self
            .store
            .get_summary(&bill.id, &bill.source_hash)
            .await?
            .filter(|summary| summary.matches(bill));

        if let Some(summary) = &cached {
            let freshness = self
                .settings
                .freshness
                .summary(Some(summary.generated_at), self.clock.now());
            if !freshness.needs_fetch() {
                tracing::trace!(bill_id = %bill.id, "Cache hit for summary");
                return Ok((Some(summary.clone()), false));
            }
        }

        match self.fetch_summary(bill).await {
            Ok(summary) => Ok((Some(summary), false)),
            Err(SummaryFailure::Store(err)) => Err(err.into()),
            Err(SummaryFailure::Model(err)) => match cached {
                Some(expired) => {
                    tracing::warn!(
                        bill_id = %bill.id,
                        error = %err,
                        "Summary generation failed, serving expired summary"
                    );
                    Ok((Some(expired), false))
                }
                None => {
                    tracing::warn!(bill_id = %bill.id, error = %err, "Summary generation failed");
                    Ok((None, true))
                }
            },
        }
    }

    async fn fetch_summary(
        &self,
        bill: &BillRecord,
    ) -> std::result::Result<SummaryRecord, SummaryFailure> {
        let key = (bill.id.clone(), bill.source_hash.clone());
        let waiter = match self.summary_tickets.join(key) {
            Ticket::Waiter(waiter) => {
                tracing::trace!(bill_id = %bill.id, "Attached to in-flight summary");
                waiter
            }
            Ticket::Owner(owner) => {
                let waiter = owner.waiter();
                let engine = self.clone();
                let bill = bill.clone();
                tokio::spawn(async move {
                    let outcome = engine.refresh_summary(&bill).await;
                    owner.resolve(outcome);
                });
                waiter
            }
        };

        waiter.outcome().await.map_err(|_| {
            SummaryFailure::Model(SummaryError::ModelUnavailable(
                "summary generation was abandoned".to_string(),
            ))
        })?
    }

    async fn refresh_summary(
        &self,
        bill: &BillRecord,
    ) -> std::result::Result<SummaryRecord, SummaryFailure> {
        let existing = self
            .store
            .get_summary(&bill.id, &bill.source_hash)
            .await
            .map_err(SummaryFailure::Store)?;
        if let Some(summary) = existing.filter(|summary| summary.matches(bill)) {
            let freshness = self
                .settings
                .freshness
                .summary(Some(summary.generated_at), self.clock.now());
            if !freshness.needs_fetch() {
                return Ok(summary);
            }
        }

        let request = bill.summary_request();
        let generated = call_with_retry(
            &self.settings.retry,
            self.settings.upstream_timeout,
            "summarize",
            || self.summarizer.summarize(&request),
        )
        .await
        .map_err(SummaryFailure::Model)?;

        let summary = SummaryRecord::for_bill(bill, generated, self.clock.now());

        // Only cache it while it still describes the stored bill version.
        let current = self
            .store
            .get_bill(&bill.id)
            .await
            .map_err(SummaryFailure::Store)?;
        if current.is_none_or(|current| current.source_hash == bill.source_hash) {
            self.store
                .put_summary(&summary)
                .await
                .map_err(SummaryFailure::Store)?;
        } else {
            tracing::debug!(bill_id = %bill.id, "Bill changed during summarization, not caching");
        }

        tracing::debug!(bill_id = %bill.id, model = %summary.model, "Summary generated");
        Ok(summary)
    }
}
