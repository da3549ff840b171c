//! Caller-facing error taxonomy and introspection of the synchronization engine.

mod error;
mod http_mapping;
mod stats;

pub use error::{Result, SyncError};
pub use http_mapping::{retry_after_seconds, sync_error_to_status_code};
pub use stats::CacheStats;
