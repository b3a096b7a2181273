//! Infoblox exports to JSON files
//!
//! Layout under the data directory:
//! - `networks.json`: networks of interest
//! - `ips/<network>.json`: used addresses per network
//! - `devices_<network>.json`: used addresses with a MAC per network

use crate::error::SyncError;
use infoblox_client::{InfobloxClient, Network};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Networks file inside the data directory
pub const NETWORKS_FILE: &str = "networks.json";

/// Whether a network takes part in the sync
///
/// Networks without a view, and VoIP views, are left out.
pub fn is_synced_network(network: &Network) -> bool {
    !network.network_view.is_empty() && !network.network_view.to_lowercase().contains("voip")
}

/// Export the networks of `view` to `<data_dir>/networks.json`
pub async fn export_networks(
    client: &InfobloxClient,
    view: &str,
    data_dir: &Path,
) -> Result<PathBuf, SyncError> {
    info!("Searching all available networks in view {}", view);
    let networks: Vec<Network> = client
        .query_networks(view)
        .await?
        .into_iter()
        .filter(is_synced_network)
        .collect();

    let path = data_dir.join(NETWORKS_FILE);
    write_json(&path, &networks)?;
    info!("Wrote {} networks to {}", networks.len(), path.display());
    Ok(path)
}

/// Path of the per-network address export
pub fn addresses_path(data_dir: &Path, network: &Network, only_with_mac: bool) -> PathBuf {
    if only_with_mac {
        data_dir.join(format!("devices_{}.json", network.file_stem()))
    } else {
        data_dir.join("ips").join(format!("{}.json", network.file_stem()))
    }
}

/// Export used addresses of every network, one file per network
pub async fn export_addresses(
    client: &InfobloxClient,
    networks: &[Network],
    data_dir: &Path,
    only_with_mac: bool,
) -> Result<Vec<PathBuf>, SyncError> {
    let mut written = Vec::with_capacity(networks.len());
    for network in networks {
        info!("Checking out {}", network.network);
        let addresses = client.query_ipv4_addresses(network, only_with_mac).await?;

        let path = addresses_path(data_dir, network, only_with_mac);
        write_json(&path, &addresses)?;
        debug!("Wrote {} addresses to {}", addresses.len(), path.display());
        written.push(path);
    }
    Ok(written)
}

/// Read `<data_dir>/networks.json`
pub fn read_networks(data_dir: &Path) -> Result<Vec<Network>, SyncError> {
    read_json(&data_dir.join(NETWORKS_FILE))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SyncError> {
    let content = std::fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Write pretty-printed JSON, creating parent directories as needed
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(|e| SyncError::io(path, e))
}
