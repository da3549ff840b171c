//! OpenStates v3 bill source.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use billwatch_core::bill::BillId;
use billwatch_core::upstream::{bill_failure_from_status, BillSource, UpstreamError};

/// Fetches raw bill payloads from `GET {base_url}/bills/{id}`.
///
/// One request per call: no retries and no caching.
#[derive(Debug, Clone)]
pub struct OpenStatesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenStatesClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn bill_url(&self, id: &BillId) -> String {
        format!("{}/bills/{}", self.base_url.trim_end_matches('/'), id)
    }
}

fn transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Unavailable("request timed out".to_string())
    } else {
        UpstreamError::Unavailable(format!("request failed: {err}"))
    }
}

#[async_trait]
impl BillSource for OpenStatesClient {
    async fn fetch_bill(&self, id: &BillId) -> Result<Value, UpstreamError> {
        let Some(api_key) = &self.api_key else {
            return Err(UpstreamError::NotConfigured(
                "OpenStates API key not configured".to_string(),
            ));
        };

        let response = self
            .client
            .get(self.bill_url(id))
            .header("X-API-KEY", api_key)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        if let Some(failure) = bill_failure_from_status(status) {
            tracing::debug!(bill_id = %id, status, "OpenStates request failed");
            return Err(failure);
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| UpstreamError::Unavailable(format!("invalid response body: {err}")))
    }
}
