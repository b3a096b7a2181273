//! Infoblox WAPI Client
//!
//! Client for reading networks and IPv4 addresses out of Infoblox.
//! Only the read paths needed to feed Device42 imports are implemented.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::*;
pub use config::InfobloxConfig;
pub use error::*;
pub use models::*;
