//! Application state.
//!
//! Holds the synchronization engine every handler works through. The Cache
//! Store behind it is chosen by the enabled storage feature and built once at
//! startup.

use std::sync::Arc;

use tokio::sync::broadcast;

use billwatch_core::cache::BillStore;

use crate::config::Config;
use crate::sync::SyncEngine;
use crate::upstream::{OpenAiSummarizer, OpenStatesClient};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: SyncEngine,
    /// Shutdown signal for background tasks.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(engine: SyncEngine) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            engine,
            shutdown_tx,
        }
    }

    /// Builds the store, the upstream clients and the engine from `config`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = build_store(config).await?;

        if config.openstates_api_key.is_none() {
            tracing::warn!("OPENSTATES_API_KEY not set, bill fetches will fail");
        }
        if config.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, summaries will be unavailable");
        }

        let source = OpenStatesClient::new(
            &config.openstates_base_url,
            config.openstates_api_key.clone(),
            config.upstream_timeout(),
        )?;
        let summarizer = OpenAiSummarizer::new(
            &config.openai_base_url,
            config.openai_api_key.clone(),
            &config.openai_model,
            config.upstream_timeout(),
        )?;

        let engine = SyncEngine::new(
            store,
            Arc::new(source),
            Arc::new(summarizer),
            config.engine_settings(),
        );
        Ok(Self::new(engine))
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal background tasks to stop.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(feature = "inmemory")]
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn BillStore>> {
    use crate::storage::InMemoryStore;

    tracing::info!(max_entries = config.cache_max_entries, "Using in-memory store");
    Ok(Arc::new(InMemoryStore::new(config.cache_max_entries)))
}

#[cfg(feature = "sqlite")]
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn BillStore>> {
    use crate::storage::SqliteStore;

    tracing::info!(path = %config.sqlite_path, "Using SQLite store");
    let store = SqliteStore::new(&config.sqlite_path).await?;
    Ok(Arc::new(store))
}
