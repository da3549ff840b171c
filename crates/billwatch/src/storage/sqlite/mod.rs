//! SQLite store backend.
//!
//! Records are stored as JSON next to the columns the store filters on
//! (`source_hash`, timestamps). Uses `rusqlite` through `tokio-rusqlite` so
//! blocking calls stay off the async runtime.

mod error;
mod repository;
mod schema;

pub use repository::SqliteStore;
