//! billwatch-client CLI entry point.

use billwatch_client::cli::admin::AdminAction;
use billwatch_client::cli::bills::BillsAction;
use billwatch_client::cli::{Cli, Commands, OutputFormat};
use billwatch_client::client::BillwatchClient;
use billwatch_client::error::ClientError;
use billwatch_client::output::{format_output, pretty};
use billwatch_core::bill::BillId;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = BillwatchClient::new(&cli.base_url);

    match cli.command {
        Commands::Bills(bills_cmd) => match bills_cmd.action {
            BillsAction::Get { id, summary } => {
                let id = BillId::parse(&id).map_err(|e| ClientError::InvalidInput(e.to_string()))?;
                let view = client.get_bill(&id, summary).await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&view, cli.format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_bill_view(&view)),
                }
            }
        },
        Commands::Admin(admin_cmd) => match admin_cmd.action {
            AdminAction::Stats => {
                let stats = client.cache_stats().await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&stats, cli.format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_stats(&stats)),
                }
            }
            AdminAction::Invalidate(args) => {
                let report = client.invalidate(&args.to_request()?).await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&report, cli.format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_report(&report)),
                }
            }
        },
        Commands::Health => {
            let health = client.health().await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&health, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_health(&health)),
            }
        }
    }

    Ok(())
}
