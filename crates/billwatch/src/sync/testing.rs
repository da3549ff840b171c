//! Hand-written upstream doubles and an engine harness for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::Value;

use billwatch_core::bill::{sample_payload, BillId, GeneratedSummary, SummaryRequest};
use billwatch_core::clock::ManualClock;
use billwatch_core::freshness::FreshnessPolicy;
use billwatch_core::retry::RetryPolicy;
use billwatch_core::upstream::{BillSource, SummaryError, Summarizer, UpstreamError};

use super::{EngineSettings, SyncEngine};
use crate::storage::InMemoryStore;

/// Bill source answering every id with the same configurable behavior.
pub struct MockSource {
    calls: AtomicUsize,
    delay: Duration,
    response: Mutex<Result<String, UpstreamError>>,
}

impl MockSource {
    /// Answers with a sample payload whose latest action is `status`.
    pub fn with_status(status: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            response: Mutex::new(Ok(status.to_string())),
        }
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            response: Mutex::new(Err(error)),
        }
    }

    /// Holds every fetch for `delay` before answering.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_status(&self, status: &str) {
        *self.response.lock() = Ok(status.to_string());
    }

    pub fn set_failure(&self, error: UpstreamError) {
        *self.response.lock() = Err(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BillSource for MockSource {
    async fn fetch_bill(&self, id: &BillId) -> Result<Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let response = self.response.lock().clone();
        response.map(|status| sample_payload(id.as_str(), &status))
    }
}

/// Summarizer that echoes the bill title, or fails when told to.
pub struct MockSummarizer {
    calls: AtomicUsize,
    delay: Mutex<Duration>,
    failure: Mutex<Option<SummaryError>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Mutex::new(Duration::ZERO),
            failure: Mutex::new(None),
        }
    }

    /// Holds every summary for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn fail_with(&self, error: Option<SummaryError>) {
        *self.failure.lock() = error;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<GeneratedSummary, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }
        Ok(GeneratedSummary {
            text: format!("Summary of {}", request.title),
            key_provisions: vec!["Housing element review".to_string()],
            impact: "Cities and counties".to_string(),
            model: "mock-model".to_string(),
        })
    }
}

/// An engine wired to mocks, an in-memory store and a manual clock.
pub struct Harness {
    pub engine: SyncEngine,
    pub source: Arc<MockSource>,
    pub summarizer: Arc<MockSummarizer>,
    pub store: Arc<InMemoryStore>,
    pub clock: ManualClock,
}

/// Bill TTL 60s, summary TTL 1h, not-found TTL 30s, retention 10min, three
/// fast attempts.
pub fn settings() -> EngineSettings {
    EngineSettings {
        freshness: FreshnessPolicy {
            bill_ttl: Duration::from_secs(60),
            summary_ttl: Duration::from_secs(3600),
            not_found_ttl: Duration::from_secs(30),
        },
        retry: RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..RetryPolicy::default()
        }
        .without_jitter(),
        upstream_timeout: Duration::from_secs(5),
        retention: Duration::from_secs(600),
    }
}

pub fn harness(source: MockSource) -> Harness {
    harness_with_store(source, Arc::new(InMemoryStore::new(100)))
}

pub fn harness_with_store(source: MockSource, store: Arc<InMemoryStore>) -> Harness {
    let source = Arc::new(source);
    let summarizer = Arc::new(MockSummarizer::new());
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());

    let engine = SyncEngine::new(
        store.clone(),
        source.clone(),
        summarizer.clone(),
        settings(),
    )
    .with_clock(Arc::new(clock.clone()));

    Harness {
        engine,
        source,
        summarizer,
        store,
        clock,
    }
}
