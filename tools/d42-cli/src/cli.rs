//! Command-line interface for d42

use clap::{Args, Parser, Subcommand};
use device42_client::DeviceLookup;

/// d42 - explore a Device42 instance from the shell
///
/// Credentials are read from the environment (D42_HOST, D42_USERNAME,
/// D42_PASSWORD), typically loaded by direnv from an `.envrc`.
#[derive(Parser, Debug)]
#[command(name = "d42")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Connection settings
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Device42 base URL
    #[arg(long, global = true, env = "D42_HOST")]
    pub host: Option<String>,

    /// Basic auth username
    #[arg(long, global = true, env = "D42_USERNAME")]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, global = true, env = "D42_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Verify the server certificate
    #[arg(long, global = true, env = "D42_VERIFY_TLS")]
    pub verify_tls: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "D42_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check that the instance is reachable and the credentials work
    Check,

    /// List buildings
    Buildings {
        /// Only the building with this name
        #[arg(long)]
        name: Option<String>,
    },

    /// List rooms
    Rooms {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        building: Option<String>,
    },

    /// List racks
    Racks {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        building: Option<String>,
        #[arg(long)]
        room: Option<String>,
    },

    /// List devices
    Devices(DevicesArgs),

    /// Show a device by ID, or look it up by another key
    Device(DeviceArgs),

    /// List VLANs
    Vlans {
        /// Only VLANs with this number
        #[arg(long)]
        number: Option<String>,
    },

    /// Run a saved DOQL query
    Doql {
        /// Name of the saved query
        name: String,
    },

    /// List service instances
    ServiceInstances,

    /// List application components
    AppComponents,

    /// List operating systems
    OperatingSystems,

    /// Set a custom field on an object
    CustomField(CustomFieldArgs),
}

/// Arguments for the devices command
#[derive(Args, Debug, Clone, Default)]
pub struct DevicesArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Device type, e.g. physical or virtual
    #[arg(long = "type")]
    pub device_type: Option<String>,

    #[arg(long)]
    pub customer: Option<String>,

    #[arg(long)]
    pub building: Option<String>,

    /// Comma separated list of columns to return
    #[arg(long)]
    pub include_cols: Option<String>,

    /// Use the `devices/all` endpoint (all columns, no filters)
    #[arg(long, conflicts_with_all = ["name", "device_type", "customer", "building"])]
    pub all: bool,
}

/// Arguments for the device command
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Device ID, or the lookup value with --by
    pub key: String,

    /// Look up by customer, name, serial or asset instead of ID
    #[arg(long)]
    pub by: Option<DeviceLookup>,

    /// Comma separated list of columns to return (with --by)
    #[arg(long, requires = "by")]
    pub include_cols: Option<String>,
}

/// Arguments for the custom-field command
#[derive(Args, Debug, Clone)]
pub struct CustomFieldArgs {
    /// Object type, e.g. device or serviceinstance
    #[arg(long)]
    pub endpoint: String,

    /// Object ID
    #[arg(long)]
    pub id: u64,

    #[arg(long)]
    pub key: String,

    #[arg(long)]
    pub value: String,
}
