//! Bill lookup operations.

use super::BillwatchClient;
use crate::error::Result;
use billwatch_core::bill::{BillId, BillView};

impl BillwatchClient {
    /// Get a bill, optionally with its AI summary.
    pub async fn get_bill(&self, id: &BillId, summary: bool) -> Result<BillView> {
        let response = self
            .client
            .get(self.url(&format!("/api/bills/{}", id)))
            .query(&[("summary", summary)])
            .send()
            .await?;
        self.handle_response(response).await
    }
}
