//! Cache Store backends.
//!
//! Both backends implement `billwatch_core::cache::BillStore`. The one the
//! server runs with is selected at compile time:
//!
//! - `inmemory` (default): LRU-bounded maps, lost on restart
//! - `sqlite`: durable store using `rusqlite` and `tokio-rusqlite`
//!
//! ```bash
//! cargo build -p billwatch --no-default-features --features sqlite
//! ```

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p billwatch --features sqlite"
);

// Always compiled: engine and handler tests run against it.
#[cfg_attr(not(feature = "inmemory"), allow(dead_code))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg_attr(not(feature = "inmemory"), allow(unused_imports))]
pub use inmemory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
