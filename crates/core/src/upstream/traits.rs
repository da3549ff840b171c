use async_trait::async_trait;
use serde_json::Value;

use crate::bill::{BillId, GeneratedSummary, SummaryRequest};

use super::{SummaryError, UpstreamError};

/// The legislative data source.
///
/// One call performs one fetch: implementations apply their own timeout and
/// never retry or cache.
#[async_trait]
pub trait BillSource: Send + Sync {
    /// Fetches the raw payload for a bill.
    async fn fetch_bill(&self, id: &BillId) -> Result<Value, UpstreamError>;
}

/// The language model that writes bill summaries.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<GeneratedSummary, SummaryError>;
}
