//! VLAN Sync
//!
//! Moves network data from Infoblox into Device42:
//! - `networks`: export the networks of a view to `data/networks.json`
//! - `ips` / `devices`: export used addresses of every exported network
//! - `vlans`: create Device42 VLANs from the networks' `VLAN` attribute

mod config;
mod error;
mod export;
mod vlan;

use crate::config::{DEFAULT_CONFIG_FILE, SyncConfig};
use crate::error::SyncError;
use clap::{Parser, Subcommand};
use device42_client::Device42Client;
use infoblox_client::InfobloxClient;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Export Infoblox networks and import their VLANs into Device42
#[derive(Parser, Debug)]
#[command(name = "vlan-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file with [infoblox] and [d42] sections
    #[arg(short, long, global = true, env = "VLAN_SYNC_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory holding the exported JSON files
    #[arg(short, long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export networks of a network view, VoIP views excluded
    Networks {
        /// Infoblox network view
        #[arg(long, default_value = "default")]
        view: String,
    },
    /// Export used IPv4 addresses of every exported network
    Ips,
    /// Export used IPv4 addresses that have a MAC address
    Devices,
    /// Create Device42 VLANs from the exported networks
    Vlans,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

async fn export_addresses(
    config: &SyncConfig,
    data_dir: &Path,
    only_with_mac: bool,
) -> Result<(), SyncError> {
    let infoblox = InfobloxClient::new(&config.infoblox()?)?;
    let networks = export::read_networks(data_dir)?;
    let written = export::export_addresses(&infoblox, &networks, data_dir, only_with_mac).await?;
    info!("Wrote {} files under {}", written.len(), data_dir.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), SyncError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = SyncConfig::load(&cli.config)?;

    match cli.command {
        Command::Networks { view } => {
            let infoblox = InfobloxClient::new(&config.infoblox()?)?;
            let path = export::export_networks(&infoblox, &view, &cli.data_dir).await?;
            info!("All done! Check the results in {}", path.display());
        }
        Command::Ips => export_addresses(&config, &cli.data_dir, false).await?,
        Command::Devices => export_addresses(&config, &cli.data_dir, true).await?,
        Command::Vlans => {
            let d42 = Device42Client::new(&config.device42()?)?;
            let networks = export::read_networks(&cli.data_dir)?;
            info!("Importing VLANs of {} networks into {}", networks.len(), d42.base_url());
            let report = vlan::import_vlans(&d42, &networks).await?;
            info!("VLAN import finished: {}", report);
        }
    }

    Ok(())
}
