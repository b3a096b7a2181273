//! Device42Client trait for mocking
//!
//! This trait abstracts the Device42Client to enable mocking in unit tests.
//! The concrete Device42Client implements this trait, and tests can use mock implementations.

use crate::error::Device42Error;
use crate::models::*;
use serde_json::Value;

/// Trait for Device42 API client operations
///
/// The generic object operations take and return raw JSON here; the typed
/// variants (`get_object::<T>`, `post_object`, typed DOQL rows) live on the
/// concrete client.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait Device42ClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Check connectivity and credentials
    async fn validate_credentials(&self) -> Result<(), Device42Error>;

    // Generic operations
    async fn get_object_value(&self, endpoint: &str, id: u64) -> Result<Value, Device42Error>;
    async fn post_object_value(&self, endpoint: &str, object: &Value) -> Result<PostResponse, Device42Error>;
    async fn put_object_value(&self, endpoint: &str, object: &Value) -> Result<PostResponse, Device42Error>;
    async fn delete_object(&self, endpoint: &str, id: u64) -> Result<DeleteResponse, Device42Error>;
    async fn doql_query(&self, query_name: &str) -> Result<Value, Device42Error>;
    async fn update_custom_field(&self, custom_field: &CustomField, endpoint: &str) -> Result<Value, Device42Error>;

    // Buildings
    async fn get_buildings(&self, name: Option<&str>) -> Result<Vec<Building>, Device42Error>;
    async fn post_building(&self, building: &Building) -> Result<PostResponse, Device42Error>;
    async fn delete_building(&self, id: u64) -> Result<DeleteResponse, Device42Error>;

    // Rooms
    async fn get_rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>, Device42Error>;
    async fn get_room(&self, id: u64) -> Result<Room, Device42Error>;
    async fn post_room(&self, room: &Room) -> Result<PostResponse, Device42Error>;
    async fn delete_room(&self, id: u64) -> Result<DeleteResponse, Device42Error>;

    // Racks
    async fn get_racks(&self, filter: &RackFilter) -> Result<Vec<Rack>, Device42Error>;
    async fn get_rack(&self, id: u64) -> Result<Rack, Device42Error>;
    async fn post_rack(&self, rack: &Rack) -> Result<PostResponse, Device42Error>;
    async fn delete_rack(&self, id: u64) -> Result<DeleteResponse, Device42Error>;

    // Devices
    async fn get_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>, Device42Error>;
    async fn get_all_devices(&self, include_cols: Option<&str>) -> Result<Vec<Device>, Device42Error>;
    async fn get_device(&self, id: u64) -> Result<Device, Device42Error>;
    async fn get_device_by_other_id(&self, lookup: DeviceLookup, value: &str, include_cols: Option<&str>) -> Result<Vec<Device>, Device42Error>;

    // IPAM
    async fn get_vlans(&self, filter: &VlanFilter) -> Result<Vec<Vlan>, Device42Error>;
    async fn post_vlan(&self, vlan: &Vlan) -> Result<PostResponse, Device42Error>;
    async fn post_network(&self, subnet: &Subnet) -> Result<PostResponse, Device42Error>;
    async fn post_ip(&self, ip: &IpAddress) -> Result<PostResponse, Device42Error>;

    // Others
    async fn get_all_service_instances(&self) -> Result<Vec<Value>, Device42Error>;
    async fn get_all_application_components(&self) -> Result<Vec<Value>, Device42Error>;
    async fn get_all_operating_systems(&self) -> Result<Vec<Value>, Device42Error>;
    async fn post_app_component(&self, component: &AppComponent) -> Result<PostResponse, Device42Error>;
    async fn post_customer(&self, customer: &Customer) -> Result<PostResponse, Device42Error>;
}
