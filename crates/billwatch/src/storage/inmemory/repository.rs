//! LRU-bounded in-memory implementation of [`BillStore`].

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lru::LruCache;
use tokio::sync::RwLock;

use billwatch_core::bill::{BillId, BillRecord, SourceHash, SummaryRecord};
use billwatch_core::cache::{
    BillStore, InvalidationReport, InvalidationRequest, Result, StoreSnapshot,
};

struct Tables {
    bills: LruCache<BillId, BillRecord>,
    summaries: LruCache<BillId, SummaryRecord>,
}

/// In-memory store with LRU eviction once `max_entries` is reached.
///
/// Reads use `peek` under the read lock and do not refresh recency, so
/// eviction order follows write order.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates an empty store holding at most `max_entries` bills and as
    /// many summaries. A capacity of zero is treated as one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            tables: Arc::new(RwLock::new(Tables {
                bills: LruCache::new(capacity),
                summaries: LruCache::new(capacity),
            })),
        }
    }
}

#[async_trait]
impl BillStore for InMemoryStore {
    async fn get_bill(&self, id: &BillId) -> Result<Option<BillRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.bills.peek(id).cloned())
    }

    async fn put_bill(&self, bill: &BillRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.bills.put(bill.id.clone(), bill.clone());
        Ok(())
    }

    async fn get_summary(&self, id: &BillId, hash: &SourceHash) -> Result<Option<SummaryRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .summaries
            .peek(id)
            .filter(|summary| &summary.source_hash == hash)
            .cloned())
    }

    async fn put_summary(&self, summary: &SummaryRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .summaries
            .put(summary.bill_id.clone(), summary.clone());
        Ok(())
    }

    async fn sweep(
        &self,
        request: &InvalidationRequest,
        now: DateTime<Utc>,
    ) -> Result<InvalidationReport> {
        let mut tables = self.tables.write().await;

        let removed: HashSet<BillId> = tables
            .bills
            .iter()
            .filter(|(id, bill)| request.scope.matches(id, bill.fetched_at, now))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &removed {
            tables.bills.pop(id);
        }

        let mut summaries_removed = 0;
        if request.include_summaries {
            let summary_ids: Vec<BillId> = tables
                .summaries
                .iter()
                .filter(|(id, summary)| {
                    removed.contains(*id) || request.scope.matches(id, summary.generated_at, now)
                })
                .map(|(id, _)| id.clone())
                .collect();
            for id in &summary_ids {
                tables.summaries.pop(id);
            }
            summaries_removed = summary_ids.len();
        }

        Ok(InvalidationReport {
            bills_removed: removed.len(),
            summaries_removed,
            not_found_cleared: 0,
        })
    }

    async fn snapshot(&self) -> Result<StoreSnapshot> {
        let tables = self.tables.read().await;
        Ok(StoreSnapshot {
            bill_fetched_at: tables.bills.iter().map(|(_, bill)| bill.fetched_at).collect(),
            summary_entries: tables.summaries.len(),
        })
    }
}
