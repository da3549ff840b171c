//! Cache administration operations.

use super::BillwatchClient;
use crate::error::Result;
use billwatch_core::cache::{InvalidationReport, InvalidationRequest};
use billwatch_core::sync::CacheStats;

impl BillwatchClient {
    /// Get cache statistics.
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        let response = self
            .client
            .get(self.url("/api/admin/cache/stats"))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Invalidate cached records.
    pub async fn invalidate(&self, request: &InvalidationRequest) -> Result<InvalidationReport> {
        let response = self
            .client
            .post(self.url("/api/admin/cache/invalidate"))
            .json(request)
            .send()
            .await?;
        self.handle_response(response).await
    }
}
