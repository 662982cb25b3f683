//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Talk to the MultiSafepay EWX payment API.
#[derive(Debug, Parser)]
#[command(name = "ewx", version, about)]
pub struct Args {
    /// Path to the TOML client configuration.
    #[arg(long, short, env = "EWX_CONFIG", default_value = "ewx.toml")]
    pub config: PathBuf,

    /// Print the request body instead of sending it.
    #[arg(long)]
    pub dry_run: bool,

    /// The operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// EWX operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the payment methods available to the merchant.
    Gateways {
        /// Country shortcode, e.g. `NL`.
        #[arg(long)]
        country: Option<String>,
        /// Locale ISO code, e.g. `nl_NL`.
        #[arg(long)]
        locale: Option<String>,
    },
    /// List the banks supported by iDEAL.
    Issuers,
    /// Start a hosted-page payment described by a TOML request file.
    Redirect {
        /// Path to the request file.
        request: PathBuf,
    },
    /// Submit a direct payment described by a TOML request file.
    Direct {
        /// Path to the request file.
        request: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gateways_with_filters() {
        let args = Args::try_parse_from([
            "ewx", "--config", "c.toml", "gateways", "--country", "NL", "--locale", "nl_NL",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("c.toml"));
        assert!(!args.dry_run);
        match args.command {
            Command::Gateways { country, locale } => {
                assert_eq!(country.as_deref(), Some("NL"));
                assert_eq!(locale.as_deref(), Some("nl_NL"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_direct_dry_run() {
        let args = Args::try_parse_from(["ewx", "--dry-run", "direct", "tx.toml"]).unwrap();
        assert!(args.dry_run);
        assert!(matches!(args.command, Command::Direct { request } if request == PathBuf::from("tx.toml")));
    }

    #[test]
    fn test_missing_command_is_rejected() {
        assert!(Args::try_parse_from(["ewx"]).is_err());
    }
}
