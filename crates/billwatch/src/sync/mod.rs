//! Synchronization engine and its supporting pieces.

mod cleanup;
mod engine;
mod not_found;
mod retry;
mod ticket;

#[cfg(test)]
pub(crate) mod testing;

pub use cleanup::spawn_cleanup;
pub use engine::{EngineSettings, SyncEngine};
