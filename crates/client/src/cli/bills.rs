//! Bill CLI commands.

use clap::{Parser, Subcommand};

/// Bill lookup commands.
#[derive(Debug, Parser)]
pub struct BillsCommand {
    #[command(subcommand)]
    pub action: BillsAction,
}

/// Available bill actions.
#[derive(Debug, Subcommand)]
pub enum BillsAction {
    /// Get a bill by ID.
    Get {
        /// Bill ID, e.g. "AB-123" or an OpenStates "ocd-bill/..." id.
        id: String,
        /// Include the AI summary.
        #[arg(long)]
        summary: bool,
    },
}
