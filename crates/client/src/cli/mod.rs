//! CLI command definitions.

pub mod admin;
pub mod bills;

use clap::{Parser, Subcommand, ValueEnum};

/// CLI client for the billwatch API.
#[derive(Debug, Parser)]
#[command(name = "billwatch-client")]
#[command(about = "CLI client for the billwatch API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "BILLWATCH_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bill lookups.
    Bills(bills::BillsCommand),
    /// Cache administration.
    Admin(admin::AdminCommand),
    /// Server health check.
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bills_get_with_summary() {
        let cli = Cli::try_parse_from([
            "billwatch-client",
            "--format",
            "json",
            "bills",
            "get",
            "AB-123",
            "--summary",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        let Commands::Bills(bills) = cli.command else {
            panic!("expected bills command");
        };
        let bills::BillsAction::Get { id, summary } = bills.action;
        assert_eq!(id, "AB-123");
        assert!(summary);
    }

    #[test]
    fn test_parse_health_with_base_url() {
        let cli = Cli::try_parse_from([
            "billwatch-client",
            "--base-url",
            "http://bills.internal:8080",
            "health",
        ])
        .unwrap();

        assert_eq!(cli.base_url, "http://bills.internal:8080");
        assert!(matches!(cli.command, Commands::Health));
        assert_eq!(cli.format, OutputFormat::Pretty);
    }
}
