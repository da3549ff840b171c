use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::bill::{BillId, BillRecord, SourceHash, SummaryRecord};

use super::{InvalidationReport, InvalidationRequest, Result};

/// Durable record of bill snapshots and their summaries.
///
/// Each single-key read or write is atomic. Implementations hold at most one
/// summary per bill; writing a summary for a new source hash replaces the old
/// one.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Gets the cached bill record, if any.
    async fn get_bill(&self, id: &BillId) -> Result<Option<BillRecord>>;

    /// Replaces the cached record for `bill.id`.
    async fn put_bill(&self, bill: &BillRecord) -> Result<()>;

    /// Gets the summary for `id`, only if it was generated from `hash`.
    async fn get_summary(&self, id: &BillId, hash: &SourceHash) -> Result<Option<SummaryRecord>>;

    /// Replaces the cached summary for `summary.bill_id`.
    async fn put_summary(&self, summary: &SummaryRecord) -> Result<()>;

    /// Removes every record the request matches in one atomic sweep.
    ///
    /// `not_found_cleared` in the returned report is always zero; negative
    /// results are not persisted.
    async fn sweep(
        &self,
        request: &InvalidationRequest,
        now: DateTime<Utc>,
    ) -> Result<InvalidationReport>;

    /// Read-only view used for statistics.
    async fn snapshot(&self) -> Result<StoreSnapshot>;
}

/// Timestamps of everything currently stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// `fetched_at` of every cached bill.
    pub bill_fetched_at: Vec<DateTime<Utc>>,
    pub summary_entries: usize,
}
