//! Device42 API client
//!
//! Implements the Device42 REST API client on top of [`HttpClient`].
//! Object endpoints live under `/api/1.0/<endpoint>/`, service instances under
//! `/api/2.0/` and saved DOQL queries under `/services/data/v1.0/query/`.

use crate::common::query::{self, to_params};
use crate::common::{HttpClient, Params};
use crate::config::Device42Config;
use crate::device42_trait::Device42ClientTrait;
use crate::error::Device42Error;
use crate::models::*;
use futures::Stream;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// API version used for object endpoints unless stated otherwise
pub const API_VERSION: &str = "1.0";

/// Device42 API client
#[derive(Debug, Clone)]
pub struct Device42Client {
    http: HttpClient,
    page_limit: u32,
}

impl Device42Client {
    /// Create a new Device42 client
    ///
    /// # Arguments
    /// * `config` - Host, credentials and transport settings
    pub fn new(config: &Device42Config) -> Result<Self, Device42Error> {
        Ok(Self {
            http: HttpClient::new(config)?,
            page_limit: config.page_limit.max(1),
        })
    }

    /// Create a client from `D42_*` environment variables
    pub fn from_env() -> Result<Self, Device42Error> {
        Self::new(&Device42Config::from_env()?)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Get the underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Check connectivity and credentials with a single one-item request
    pub async fn validate_credentials(&self) -> Result<(), Device42Error> {
        debug!("Validating Device42 credentials and connectivity");
        let query = vec![
            ("limit".to_string(), "1".to_string()),
            ("offset".to_string(), "0".to_string()),
        ];
        self.http.get(&object_path("buildings"), &query).await?;
        debug!("Credentials validated successfully");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Generic helpers
    // -----------------------------------------------------------------------

    /// Stream the raw pages of a paginated endpoint
    ///
    /// # Arguments
    /// * `path` - Absolute API path, e.g. `/api/1.0/devices/`
    /// * `params` - Filters sent with every page request
    pub fn stream_pages<'a>(
        &'a self,
        path: &'a str,
        params: Params,
    ) -> impl Stream<Item = Result<Vec<Value>, Device42Error>> + 'a {
        query::paginate(&self.http, path, params, self.page_limit)
    }

    /// Fetch every page of a paginated endpoint and flatten the results
    pub async fn query_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params,
    ) -> Result<Vec<T>, Device42Error> {
        query::query_resources(&self.http, path, params, self.page_limit).await
    }

    /// Get a single object by ID from `/api/1.0/{endpoint}/{id}/`
    pub async fn get_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        id: u64,
    ) -> Result<T, Device42Error> {
        let path = format!("/api/{}/{}/{}/", API_VERSION, endpoint, id);
        let value = self.http.get(&path, &[]).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create or update an object via POST `/api/1.0/{endpoint}/`
    ///
    /// POST both creates and updates, matching on the object's identifying
    /// field (usually `name`).
    pub async fn post_object<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        object: &T,
    ) -> Result<PostResponse, Device42Error> {
        let form = to_params(object)?;
        debug!("Posting {} with {} fields", endpoint, form.len());
        let msg = self.http.post(&object_path(endpoint), &form).await?;
        PostResponse::from_msg(&msg)
    }

    /// Update an existing object via PUT `/api/1.0/{endpoint}/`
    pub async fn put_object<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        object: &T,
    ) -> Result<PostResponse, Device42Error> {
        let form = to_params(object)?;
        debug!("Putting {} with {} fields", endpoint, form.len());
        let msg = self.http.put(&object_path(endpoint), &form).await?;
        PostResponse::from_msg(&msg)
    }

    /// Delete an object via DELETE `/api/1.0/{endpoint}/{id}/`
    pub async fn delete_object(
        &self,
        endpoint: &str,
        id: u64,
    ) -> Result<DeleteResponse, Device42Error> {
        let path = format!("/api/{}/{}/{}/", API_VERSION, endpoint, id);
        debug!("Deleting {} {}", endpoint, id);
        let value = self.http.delete(&path).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Run a saved DOQL query and decode its JSON output
    ///
    /// DOQL queries are user-authored SQL stored in Device42; the shape of
    /// the result depends entirely on the query.
    pub async fn doql_query<T: DeserializeOwned>(&self, query_name: &str) -> Result<T, Device42Error> {
        let query = vec![
            ("saved_query_name".to_string(), query_name.to_string()),
            ("delimiter".to_string(), String::new()),
            ("header".to_string(), "yes".to_string()),
            ("output_type".to_string(), "json".to_string()),
        ];
        debug!("Running DOQL query {}", query_name);
        let value = self.http.get("/services/data/v1.0/query/", &query).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Update a custom field on a Device42 object
    ///
    /// # Arguments
    /// * `custom_field` - Object ID, key and (string) value
    /// * `endpoint` - Object type, e.g. `serviceinstance` or `device`
    pub async fn update_custom_field(
        &self,
        custom_field: &CustomField,
        endpoint: &str,
    ) -> Result<Value, Device42Error> {
        let path = format!("/api/{}/custom_fields/{}/", API_VERSION, endpoint);
        debug!("Updating custom field {} on {} {}", custom_field.key, endpoint, custom_field.id);
        self.http.put(&path, &to_params(custom_field)?).await
    }

    // -----------------------------------------------------------------------
    // Buildings
    // -----------------------------------------------------------------------

    /// Query buildings, optionally filtered by name
    pub async fn get_buildings(&self, name: Option<&str>) -> Result<Vec<Building>, Device42Error> {
        let params: Params = name
            .map(|n| vec![("name".to_string(), n.to_string())])
            .unwrap_or_default();
        self.query_all(&object_path("buildings"), params).await
    }

    /// Create or update a building
    pub async fn post_building(&self, building: &Building) -> Result<PostResponse, Device42Error> {
        self.post_object("buildings", building).await
    }

    /// Delete a building
    pub async fn delete_building(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete_object("buildings", id).await
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    /// Query rooms
    pub async fn get_rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>, Device42Error> {
        self.query_all(&object_path("rooms"), to_params(filter)?).await
    }

    /// Get a room by ID
    pub async fn get_room(&self, id: u64) -> Result<Room, Device42Error> {
        self.get_object("rooms", id).await
    }

    /// Create or update a room
    pub async fn post_room(&self, room: &Room) -> Result<PostResponse, Device42Error> {
        self.post_object("rooms", room).await
    }

    /// Delete a room
    pub async fn delete_room(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete_object("rooms", id).await
    }

    // -----------------------------------------------------------------------
    // Racks
    // -----------------------------------------------------------------------

    /// Query racks
    pub async fn get_racks(&self, filter: &RackFilter) -> Result<Vec<Rack>, Device42Error> {
        self.query_all(&object_path("racks"), to_params(filter)?).await
    }

    /// Get a rack by ID
    pub async fn get_rack(&self, id: u64) -> Result<Rack, Device42Error> {
        self.get_object("racks", id).await
    }

    /// Create or update a rack
    pub async fn post_rack(&self, rack: &Rack) -> Result<PostResponse, Device42Error> {
        self.post_object("racks", rack).await
    }

    /// Delete a rack
    pub async fn delete_rack(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete_object("racks", id).await
    }

    // -----------------------------------------------------------------------
    // Devices
    // -----------------------------------------------------------------------

    /// Query devices
    pub async fn get_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>, Device42Error> {
        self.query_all(&object_path("devices"), to_params(filter)?).await
    }

    /// Query `/api/1.0/devices/all/`, which returns more detail per device
    ///
    /// # Arguments
    /// * `include_cols` - Comma separated list of columns to limit the output to
    pub async fn get_all_devices(&self, include_cols: Option<&str>) -> Result<Vec<Device>, Device42Error> {
        let params: Params = include_cols
            .map(|c| vec![("include_cols".to_string(), c.to_string())])
            .unwrap_or_default();
        self.query_all(&format!("/api/{}/devices/all/", API_VERSION), params).await
    }

    /// Get a device by ID
    pub async fn get_device(&self, id: u64) -> Result<Device, Device42Error> {
        self.get_object("devices", id).await
    }

    /// Find devices through a secondary key (customer ID, name, serial or asset number)
    pub async fn get_device_by_other_id(
        &self,
        lookup: DeviceLookup,
        value: &str,
        include_cols: Option<&str>,
    ) -> Result<Vec<Device>, Device42Error> {
        let path = format!(
            "/api/{}/devices/{}/{}/",
            API_VERSION,
            lookup.as_str(),
            urlencoding::encode(value)
        );
        let params: Params = include_cols
            .map(|c| vec![("include_cols".to_string(), c.to_string())])
            .unwrap_or_default();
        self.query_all(&path, params).await
    }

    // -----------------------------------------------------------------------
    // IPAM
    // -----------------------------------------------------------------------

    /// Query VLANs
    pub async fn get_vlans(&self, filter: &VlanFilter) -> Result<Vec<Vlan>, Device42Error> {
        self.query_all(&object_path("vlans"), to_params(filter)?).await
    }

    /// Create or update a VLAN
    pub async fn post_vlan(&self, vlan: &Vlan) -> Result<PostResponse, Device42Error> {
        self.post_object("vlans", vlan).await
    }

    /// Create or update a subnet
    pub async fn post_network(&self, subnet: &Subnet) -> Result<PostResponse, Device42Error> {
        self.post_object("subnets", subnet).await
    }

    /// Create or update an IP address
    pub async fn post_ip(&self, ip: &IpAddress) -> Result<PostResponse, Device42Error> {
        self.post_object("ips", ip).await
    }

    // -----------------------------------------------------------------------
    // Others
    // -----------------------------------------------------------------------

    /// All service instances (API 2.0)
    pub async fn get_all_service_instances(&self) -> Result<Vec<Value>, Device42Error> {
        self.query_all("/api/2.0/service_instances/", Vec::new()).await
    }

    /// All application components
    pub async fn get_all_application_components(&self) -> Result<Vec<Value>, Device42Error> {
        self.query_all(&object_path("appcomps"), Vec::new()).await
    }

    /// All operating systems
    pub async fn get_all_operating_systems(&self) -> Result<Vec<Value>, Device42Error> {
        self.query_all(&object_path("operatingsystems"), Vec::new()).await
    }

    /// Create or update an application component
    pub async fn post_app_component(&self, component: &AppComponent) -> Result<PostResponse, Device42Error> {
        self.post_object("appcomps", component).await
    }

    /// Create, update or rename a customer
    pub async fn post_customer(&self, customer: &Customer) -> Result<PostResponse, Device42Error> {
        self.post_object("customers", customer).await
    }
}

fn object_path(endpoint: &str) -> String {
    format!("/api/{}/{}/", API_VERSION, endpoint)
}

#[async_trait::async_trait]
impl Device42ClientTrait for Device42Client {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn validate_credentials(&self) -> Result<(), Device42Error> {
        self.validate_credentials().await
    }

    async fn get_object_value(&self, endpoint: &str, id: u64) -> Result<Value, Device42Error> {
        self.get_object(endpoint, id).await
    }

    async fn post_object_value(&self, endpoint: &str, object: &Value) -> Result<PostResponse, Device42Error> {
        self.post_object(endpoint, object).await
    }

    async fn put_object_value(&self, endpoint: &str, object: &Value) -> Result<PostResponse, Device42Error> {
        self.put_object(endpoint, object).await
    }

    async fn delete_object(&self, endpoint: &str, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete_object(endpoint, id).await
    }

    async fn doql_query(&self, query_name: &str) -> Result<Value, Device42Error> {
        self.doql_query(query_name).await
    }

    async fn update_custom_field(&self, custom_field: &CustomField, endpoint: &str) -> Result<Value, Device42Error> {
        self.update_custom_field(custom_field, endpoint).await
    }

    async fn get_buildings(&self, name: Option<&str>) -> Result<Vec<Building>, Device42Error> {
        self.get_buildings(name).await
    }

    async fn post_building(&self, building: &Building) -> Result<PostResponse, Device42Error> {
        self.post_building(building).await
    }

    async fn delete_building(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete_building(id).await
    }

    async fn get_rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>, Device42Error> {
        self.get_rooms(filter).await
    }

    async fn get_room(&self, id: u64) -> Result<Room, Device42Error> {
        self.get_room(id).await
    }

    async fn post_room(&self, room: &Room) -> Result<PostResponse, Device42Error> {
        self.post_room(room).await
    }

    async fn delete_room(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete_room(id).await
    }

    async fn get_racks(&self, filter: &RackFilter) -> Result<Vec<Rack>, Device42Error> {
        self.get_racks(filter).await
    }

    async fn get_rack(&self, id: u64) -> Result<Rack, Device42Error> {
        self.get_rack(id).await
    }

    async fn post_rack(&self, rack: &Rack) -> Result<PostResponse, Device42Error> {
        self.post_rack(rack).await
    }

    async fn delete_rack(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete_rack(id).await
    }

    async fn get_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>, Device42Error> {
        self.get_devices(filter).await
    }

    async fn get_all_devices(&self, include_cols: Option<&str>) -> Result<Vec<Device>, Device42Error> {
        self.get_all_devices(include_cols).await
    }

    async fn get_device(&self, id: u64) -> Result<Device, Device42Error> {
        self.get_device(id).await
    }

    async fn get_device_by_other_id(&self, lookup: DeviceLookup, value: &str, include_cols: Option<&str>) -> Result<Vec<Device>, Device42Error> {
        self.get_device_by_other_id(lookup, value, include_cols).await
    }

    async fn get_vlans(&self, filter: &VlanFilter) -> Result<Vec<Vlan>, Device42Error> {
        self.get_vlans(filter).await
    }

    async fn post_vlan(&self, vlan: &Vlan) -> Result<PostResponse, Device42Error> {
        self.post_vlan(vlan).await
    }

    async fn post_network(&self, subnet: &Subnet) -> Result<PostResponse, Device42Error> {
        self.post_network(subnet).await
    }

    async fn post_ip(&self, ip: &IpAddress) -> Result<PostResponse, Device42Error> {
        self.post_ip(ip).await
    }

    async fn get_all_service_instances(&self) -> Result<Vec<Value>, Device42Error> {
        self.get_all_service_instances().await
    }

    async fn get_all_application_components(&self) -> Result<Vec<Value>, Device42Error> {
        self.get_all_application_components().await
    }

    async fn get_all_operating_systems(&self) -> Result<Vec<Value>, Device42Error> {
        self.get_all_operating_systems().await
    }

    async fn post_app_component(&self, component: &AppComponent) -> Result<PostResponse, Device42Error> {
        self.post_app_component(component).await
    }

    async fn post_customer(&self, customer: &Customer) -> Result<PostResponse, Device42Error> {
        self.post_customer(customer).await
    }
}
