//! Cache administration CLI commands.

use clap::{ArgGroup, Args, Parser, Subcommand};

use billwatch_core::bill::BillId;
use billwatch_core::cache::{InvalidationRequest, InvalidationScope};

use crate::error::{ClientError, Result};

/// Cache administration commands.
#[derive(Debug, Parser)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub action: AdminAction,
}

/// Available admin actions.
#[derive(Debug, Subcommand)]
pub enum AdminAction {
    /// Show cache statistics.
    Stats,
    /// Drop cached records.
    Invalidate(InvalidateArgs),
}

/// Exactly one scope flag selects what is dropped.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("scope").required(true).args(["id", "pattern", "expired", "all"])))]
pub struct InvalidateArgs {
    /// A single bill ID.
    #[arg(long)]
    pub id: Option<String>,
    /// Bill IDs matching a glob, e.g. "AB-*".
    #[arg(long)]
    pub pattern: Option<String>,
    /// Bills fetched more than this many seconds ago.
    #[arg(long, value_name = "SECS")]
    pub expired: Option<u64>,
    /// Everything.
    #[arg(long)]
    pub all: bool,
    /// Also drop summaries of the matched bills.
    #[arg(long)]
    pub include_summaries: bool,
}

impl InvalidateArgs {
    /// Builds the request body sent to the server.
    pub fn to_request(&self) -> Result<InvalidationRequest> {
        let scope = if let Some(raw) = &self.id {
            let id = BillId::parse(raw).map_err(|e| ClientError::InvalidInput(e.to_string()))?;
            InvalidationScope::Bill { id }
        } else if let Some(pattern) = &self.pattern {
            InvalidationScope::Matching {
                pattern: pattern.clone(),
            }
        } else if let Some(older_than_seconds) = self.expired {
            InvalidationScope::Expired { older_than_seconds }
        } else if self.all {
            InvalidationScope::All
        } else {
            return Err(ClientError::InvalidInput(
                "one of --id, --pattern, --expired or --all is required".to_string(),
            ));
        };

        Ok(InvalidationRequest {
            scope,
            include_summaries: self.include_summaries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    fn invalidate_args(args: &[&str]) -> std::result::Result<InvalidateArgs, clap::Error> {
        let argv = ["billwatch-client", "admin", "invalidate"]
            .into_iter()
            .chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv)?;
        match cli.command {
            Commands::Admin(AdminCommand {
                action: AdminAction::Invalidate(args),
            }) => Ok(args),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_invalidate_by_id() {
        let request = invalidate_args(&["--id", "AB-123"])
            .unwrap()
            .to_request()
            .unwrap();

        assert_eq!(
            request,
            InvalidationRequest::bill(BillId::parse("AB-123").unwrap())
        );
    }

    #[test]
    fn test_invalidate_pattern_with_summaries() {
        let request = invalidate_args(&["--pattern", "SB-*", "--include-summaries"])
            .unwrap()
            .to_request()
            .unwrap();

        assert_eq!(
            request.scope,
            InvalidationScope::Matching {
                pattern: "SB-*".to_string()
            }
        );
        assert!(request.include_summaries);
    }

    #[test]
    fn test_invalidate_expired() {
        let request = invalidate_args(&["--expired", "86400"])
            .unwrap()
            .to_request()
            .unwrap();

        assert_eq!(request, InvalidationRequest::expired(86_400));
    }

    #[test]
    fn test_invalidate_requires_exactly_one_scope() {
        assert!(invalidate_args(&[]).is_err());
        assert!(invalidate_args(&["--all", "--id", "AB-1"]).is_err());
    }

    #[test]
    fn test_invalidate_rejects_bad_id() {
        let args = invalidate_args(&["--id", "AB 1"]).unwrap();
        assert!(matches!(
            args.to_request(),
            Err(ClientError::InvalidInput(_))
        ));
    }
}
