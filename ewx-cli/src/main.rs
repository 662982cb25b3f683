//! EWX command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # List gateways for the Netherlands using ewx.toml in the current directory
//! ewx gateways --country NL --locale nl_NL
//!
//! # Show the request body of a redirect transaction without sending it
//! ewx --dry-run redirect order.toml
//!
//! # Use another configuration file and verbose logging
//! EWX_CONFIG=/etc/ewx.toml RUST_LOG=debug ewx issuers
//! ```
//!
//! # Environment Variables
//!
//! - `EWX_CONFIG` - Path to the TOML configuration (default: `ewx.toml`)
//! - `EWX_ACCOUNT`, `EWX_SITE_ID`, `EWX_SITE_SECURE_CODE` - Credential overrides
//! - `EWX_ENV` - `production` or `test`
//! - `EWX_RESPONSE_FORMAT` - `raw-xml` or `parsed-object`
//! - `RUST_LOG` - Log level filter (default: `info`)

use std::io::Write;

use clap::Parser;
use ewx::{DirectTransaction, GatewayRequest, GatewayResponse, GatewaysQuery, RedirectTransaction};
use ewx_http::GatewayClient;
use tracing_subscriber::EnvFilter;

use ewx_cli::args::{Args, Command};
use ewx_cli::config;
use ewx_cli::error::CliError;

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        tracing::error!("ewx failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = config::load(&args.config)?;
    tracing::info!(
        environment = %config.environment,
        endpoint = config.endpoint(),
        account = %config.account,
        "Loaded configuration"
    );
    if config.account.is_empty() {
        tracing::warn!("No merchant account configured - EWX will reject the request");
    }

    let request = build_request(args.command)?;
    let client = GatewayClient::new(config)?;

    let output = if args.dry_run {
        client.render(&request)?
    } else {
        tracing::info!(operation = request.root_name(), "Sending request");
        match client.send(&request).await? {
            GatewayResponse::Raw(body) => body,
            GatewayResponse::Parsed(tree) => serde_json::to_string_pretty(&tree)?,
        }
    };
    writeln!(std::io::stdout().lock(), "{output}")?;
    Ok(())
}

fn build_request(command: Command) -> Result<GatewayRequest, CliError> {
    Ok(match command {
        Command::Gateways { country, locale } => {
            GatewayRequest::Gateways(GatewaysQuery { country, locale })
        }
        Command::Issuers => GatewayRequest::IdealIssuers,
        Command::Redirect { request } => {
            let tx: RedirectTransaction = config::read_toml(&request)?;
            tx.into()
        }
        Command::Direct { request } => {
            let tx: DirectTransaction = config::read_toml(&request)?;
            tx.into()
        }
    })
}
