//! In-memory store backend.
//!
//! Bills and summaries live in LRU-bounded maps behind a single
//! `tokio::sync::RwLock`, so an invalidation sweep is one atomic write.
//! Nothing survives a restart.

mod repository;

pub use repository::InMemoryStore;
