//! HTTP client for the billwatch API.

pub mod admin;
pub mod bills;
pub mod health;

use crate::error::{ClientError, Result};

/// HTTP client for the billwatch API.
#[derive(Debug, Clone)]
pub struct BillwatchClient {
    client: reqwest::Client,
    base_url: String,
}

impl BillwatchClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create from environment (BILLWATCH_URL or default).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BILLWATCH_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Decode a success body or turn the server's error body into a `ClientError`.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(ClientError::from)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_response(status.as_u16(), &body))
        }
    }
}
