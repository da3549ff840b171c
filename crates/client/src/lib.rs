//! billwatch_client - CLI client for the billwatch API.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;

pub use client::BillwatchClient;
pub use error::{ClientError, Result};
