//! Device42 REST API Client
//!
//! A Rust client library for the Device42 CMDB REST API.
//! Provides typed models, form-encoded writes and transparent pagination.
//!
//! # Example
//!
//! ```no_run
//! use device42_client::{Building, Device42Client, Device42Config, RackFilter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Credentials from D42_HOST / D42_USERNAME / D42_PASSWORD
//! let client = Device42Client::new(&Device42Config::from_env()?)?;
//!
//! // Create or update a building
//! let res = client.post_building(&Building::new("HQ", "1 Main Street")).await?;
//! println!("building {} -> id {}", res.message, res.id);
//!
//! // Fetch every rack of a building, across all pages
//! let racks = client
//!     .get_racks(&RackFilter {
//!         building: Some("HQ".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{} racks", racks.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Buildings, rooms, racks, devices**: Query, create/update and delete
//! - **IPAM**: VLANs, subnets and IP addresses
//! - **DOQL**: Run saved queries
//! - **Custom fields**: Update custom fields of any object
//! - **Retry Logic**: Dropped connections are retried with Fibonacci backoff
//! - **Pagination**: Lazy page streams or flattened result lists

pub mod backoff;
pub mod client;
pub mod common;
pub mod config;
#[path = "trait.rs"]
pub mod device42_trait;
pub mod error;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod models;

pub use client::Device42Client;
pub use common::HttpClient;
pub use common::query::Page;
pub use config::Device42Config;
pub use device42_trait::Device42ClientTrait;
pub use error::Device42Error;
#[cfg(feature = "test-util")]
pub use mock::MockDevice42Client;
pub use models::*;
