//! d42
//!
//! Small exploration CLI over the Device42 client. Results are printed as
//! pretty JSON so they can be piped into `jq`.

mod cli;
mod commands;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, ConnectionArgs};
use device42_client::{Device42Client, Device42Config};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr, stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn build_config(args: ConnectionArgs) -> Result<Device42Config> {
    let missing = |name: &str| anyhow!("--{0} or D42_{1} is required", name, name.to_uppercase());

    let mut config = Device42Config::new(
        args.host.ok_or_else(|| missing("host"))?,
        args.username.ok_or_else(|| missing("username"))?,
        args.password.ok_or_else(|| missing("password"))?,
    )
    .with_verify_tls(args.verify_tls);

    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(cli.connection)?;
    debug!("Using {:?}", config);
    let client = Device42Client::new(&config).context("failed to build HTTP client")?;

    let output = commands::run(&client, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
