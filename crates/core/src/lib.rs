//! billwatch_core - pure types, decisions and seams for bill synchronization.
//!
//! Everything in this crate is free of I/O. Network clients, storage backends
//! and the synchronization engine itself live in the `billwatch` binary crate
//! and plug into the traits defined here.

pub mod bill;
pub mod cache;
pub mod clock;
pub mod freshness;
pub mod retry;
pub mod sync;
pub mod upstream;
