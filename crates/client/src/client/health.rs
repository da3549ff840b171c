//! Health check operations.

use super::BillwatchClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Server health as reported by `/healthz`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub bill_entries: usize,
    pub summary_entries: usize,
    pub in_flight_fetches: usize,
}

impl BillwatchClient {
    /// Check server health.
    pub async fn health(&self) -> Result<Health> {
        let response = self.client.get(self.url("/healthz")).send().await?;
        self.handle_response(response).await
    }
}
