//! Mock Device42Client for unit testing
//!
//! This module provides a mock implementation of Device42ClientTrait that can be used
//! in unit tests without requiring a running Device42 instance.
//!
//! POST behaves like Device42: objects are matched on their identifying field
//! (name, network, address) and updated in place, otherwise created. VLANs are
//! always created, since Device42 allows several VLANs with the same number.
//! Objects written through the generic `*_object_value` operations live in
//! their own per-endpoint store, matched on `name`.

use crate::device42_trait::Device42ClientTrait;
use crate::error::Device42Error;
use crate::models::*;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Mock Device42Client for testing
///
/// Resources are kept in memory; clones share the same store.
#[derive(Clone, Debug)]
pub struct MockDevice42Client {
    pub(crate) base_url: String,
    pub(crate) buildings: Arc<Mutex<BTreeMap<u64, Building>>>,
    pub(crate) rooms: Arc<Mutex<BTreeMap<u64, Room>>>,
    pub(crate) racks: Arc<Mutex<BTreeMap<u64, Rack>>>,
    pub(crate) devices: Arc<Mutex<BTreeMap<u64, Device>>>,
    pub(crate) vlans: Arc<Mutex<BTreeMap<u64, Vlan>>>,
    pub(crate) subnets: Arc<Mutex<BTreeMap<u64, Subnet>>>,
    pub(crate) ips: Arc<Mutex<BTreeMap<u64, IpAddress>>>,
    pub(crate) app_components: Arc<Mutex<BTreeMap<u64, AppComponent>>>,
    pub(crate) customers: Arc<Mutex<BTreeMap<u64, Customer>>>,
    pub(crate) custom_fields: Arc<Mutex<Vec<(String, CustomField)>>>,
    pub(crate) doql_results: Arc<Mutex<HashMap<String, Value>>>,
    pub(crate) service_instances: Arc<Mutex<Vec<Value>>>,
    pub(crate) operating_systems: Arc<Mutex<Vec<Value>>>,
    pub(crate) objects: Arc<Mutex<BTreeMap<(String, u64), Value>>>,
    /// Endpoints whose writes fail with a non-zero return code
    pub(crate) failing_endpoints: Arc<Mutex<HashMap<String, String>>>,
    pub(crate) next_id: Arc<Mutex<u64>>,
}

impl MockDevice42Client {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            buildings: Arc::default(),
            rooms: Arc::default(),
            racks: Arc::default(),
            devices: Arc::default(),
            vlans: Arc::default(),
            subnets: Arc::default(),
            ips: Arc::default(),
            app_components: Arc::default(),
            customers: Arc::default(),
            custom_fields: Arc::default(),
            doql_results: Arc::default(),
            service_instances: Arc::default(),
            operating_systems: Arc::default(),
            objects: Arc::default(),
            failing_endpoints: Arc::default(),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a VLAN to the mock store (for test setup)
    pub fn add_vlan(&self, mut vlan: Vlan) -> u64 {
        let id = vlan.vlan_id.unwrap_or_else(|| self.next_id());
        vlan.vlan_id = Some(id);
        self.vlans.lock().unwrap().insert(id, vlan);
        id
    }

    /// Add a device to the mock store (for test setup)
    pub fn add_device(&self, mut device: Device) -> u64 {
        let id = device.device_id.unwrap_or_else(|| self.next_id());
        device.device_id = Some(id);
        self.devices.lock().unwrap().insert(id, device);
        id
    }

    /// Register the JSON result of a saved DOQL query (for test setup)
    pub fn set_doql_result(&self, query_name: impl Into<String>, result: Value) {
        self.doql_results.lock().unwrap().insert(query_name.into(), result);
    }

    /// Register service instances returned by `get_all_service_instances`
    pub fn set_service_instances(&self, instances: Vec<Value>) {
        *self.service_instances.lock().unwrap() = instances;
    }

    /// Register operating systems returned by `get_all_operating_systems`
    pub fn set_operating_systems(&self, systems: Vec<Value>) {
        *self.operating_systems.lock().unwrap() = systems;
    }

    /// Make every write to `endpoint` fail with a non-zero return code
    pub fn fail_writes_to(&self, endpoint: impl Into<String>, message: impl Into<String>) {
        self.failing_endpoints
            .lock()
            .unwrap()
            .insert(endpoint.into(), message.into());
    }

    /// All VLANs currently stored
    pub fn vlans(&self) -> Vec<Vlan> {
        self.vlans.lock().unwrap().values().cloned().collect()
    }

    /// All custom field updates received, with the endpoint they targeted
    pub fn custom_field_updates(&self) -> Vec<(String, CustomField)> {
        self.custom_fields.lock().unwrap().clone()
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }

    fn check_writable(&self, endpoint: &str) -> Result<(), Device42Error> {
        match self.failing_endpoints.lock().unwrap().get(endpoint) {
            Some(message) => Err(Device42Error::ReturnCode(message.clone())),
            None => Ok(()),
        }
    }

    /// Insert or update by key, returning the Device42-style POST response
    fn upsert<T: Clone>(
        &self,
        endpoint: &str,
        store: &Mutex<BTreeMap<u64, T>>,
        item: &T,
        identifier: &str,
        same: impl Fn(&T) -> bool,
    ) -> Result<PostResponse, Device42Error> {
        self.check_writable(endpoint)?;
        let mut store = store.lock().unwrap();
        let existing = store.iter().find(|(_, v)| same(v)).map(|(k, _)| *k);
        let (id, created) = match existing {
            Some(id) => (id, false),
            None => (self.next_id(), true),
        };
        store.insert(id, item.clone());
        Ok(PostResponse {
            message: format!("{} added/updated.", endpoint.trim_end_matches('s')),
            id,
            identifier: json!(identifier),
            created: Some(created),
            updated: Some(!created),
        })
    }

    fn delete<T>(
        &self,
        endpoint: &str,
        store: &Mutex<BTreeMap<u64, T>>,
        id: u64,
    ) -> Result<DeleteResponse, Device42Error> {
        match store.lock().unwrap().remove(&id) {
            Some(_) => Ok(DeleteResponse { deleted: true, id }),
            None => Err(Device42Error::NotFound(format!("{} {} not found", endpoint, id))),
        }
    }

    /// Store a raw object, matching an existing one of the endpoint by `name`
    fn write_object(
        &self,
        endpoint: &str,
        object: &Value,
        create: bool,
    ) -> Result<PostResponse, Device42Error> {
        self.check_writable(endpoint)?;
        let name = object.get("name").cloned().unwrap_or(Value::Null);
        let mut store = self.objects.lock().unwrap();
        let existing = store
            .iter()
            .find(|((e, _), v)| e == endpoint && !name.is_null() && v.get("name") == Some(&name))
            .map(|((_, id), _)| *id);
        let (id, created) = match existing {
            Some(id) => (id, false),
            None if create => (self.next_id(), true),
            None => return Err(Device42Error::NotFound(format!("{} {} not found", endpoint, name))),
        };
        store.insert((endpoint.to_string(), id), object.clone());
        Ok(PostResponse {
            message: format!("{} added/updated.", endpoint.trim_end_matches('s')),
            id,
            identifier: name,
            created: Some(created),
            updated: Some(!created),
        })
    }

    fn get<T: Clone>(
        &self,
        endpoint: &str,
        store: &Mutex<BTreeMap<u64, T>>,
        id: u64,
    ) -> Result<T, Device42Error> {
        store
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Device42Error::NotFound(format!("{} {} not found", endpoint, id)))
    }
}

fn matches(filter: Option<&str>, value: Option<&str>) -> bool {
    filter.is_none_or(|f| value == Some(f))
}

#[async_trait::async_trait]
impl Device42ClientTrait for MockDevice42Client {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_credentials(&self) -> Result<(), Device42Error> {
        Ok(())
    }

    async fn get_object_value(&self, endpoint: &str, id: u64) -> Result<Value, Device42Error> {
        self.objects
            .lock()
            .unwrap()
            .get(&(endpoint.to_string(), id))
            .cloned()
            .ok_or_else(|| Device42Error::NotFound(format!("{} {} not found", endpoint, id)))
    }

    async fn post_object_value(&self, endpoint: &str, object: &Value) -> Result<PostResponse, Device42Error> {
        self.write_object(endpoint, object, true)
    }

    async fn put_object_value(&self, endpoint: &str, object: &Value) -> Result<PostResponse, Device42Error> {
        self.write_object(endpoint, object, false)
    }

    async fn delete_object(&self, endpoint: &str, id: u64) -> Result<DeleteResponse, Device42Error> {
        match self.objects.lock().unwrap().remove(&(endpoint.to_string(), id)) {
            Some(_) => Ok(DeleteResponse { deleted: true, id }),
            None => Err(Device42Error::NotFound(format!("{} {} not found", endpoint, id))),
        }
    }

    async fn doql_query(&self, query_name: &str) -> Result<Value, Device42Error> {
        self.doql_results
            .lock()
            .unwrap()
            .get(query_name)
            .cloned()
            .ok_or_else(|| Device42Error::NotFound(format!("saved query {} not found", query_name)))
    }

    async fn update_custom_field(&self, custom_field: &CustomField, endpoint: &str) -> Result<Value, Device42Error> {
        self.check_writable("custom_fields")?;
        self.custom_fields
            .lock()
            .unwrap()
            .push((endpoint.to_string(), custom_field.clone()));
        Ok(json!([0, "custom key pair values added or updated"]))
    }

    async fn get_buildings(&self, name: Option<&str>) -> Result<Vec<Building>, Device42Error> {
        Ok(self
            .buildings
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, b)| matches(name, Some(b.name.as_str())))
            .map(|(id, b)| Building {
                building_id: Some(*id),
                ..b.clone()
            })
            .collect())
    }

    async fn post_building(&self, building: &Building) -> Result<PostResponse, Device42Error> {
        self.upsert("buildings", &self.buildings, building, &building.name, |b| b.name == building.name)
    }

    async fn delete_building(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete("buildings", &self.buildings, id)
    }

    async fn get_rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>, Device42Error> {
        Ok(self
            .rooms
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| {
                matches(filter.name.as_deref(), Some(r.name.as_str()))
                    && filter.building_id.is_none_or(|b| r.building_id == Some(b))
            })
            .map(|(id, r)| Room {
                room_id: Some(*id),
                ..r.clone()
            })
            .collect())
    }

    async fn get_room(&self, id: u64) -> Result<Room, Device42Error> {
        self.get("rooms", &self.rooms, id).map(|r| Room { room_id: Some(id), ..r })
    }

    async fn post_room(&self, room: &Room) -> Result<PostResponse, Device42Error> {
        self.upsert("rooms", &self.rooms, room, &room.name, |r| {
            r.name == room.name && r.building_id == room.building_id
        })
    }

    async fn delete_room(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete("rooms", &self.rooms, id)
    }

    async fn get_racks(&self, filter: &RackFilter) -> Result<Vec<Rack>, Device42Error> {
        Ok(self
            .racks
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| {
                matches(filter.name.as_deref(), Some(r.name.as_str()))
                    && matches(filter.building.as_deref(), r.building.as_deref())
                    && matches(filter.room.as_deref(), r.room.as_deref())
                    && filter.room_id.is_none_or(|id| r.room_id == Some(id))
            })
            .map(|(id, r)| Rack {
                rack_id: Some(*id),
                ..r.clone()
            })
            .collect())
    }

    async fn get_rack(&self, id: u64) -> Result<Rack, Device42Error> {
        self.get("racks", &self.racks, id).map(|r| Rack { rack_id: Some(id), ..r })
    }

    async fn post_rack(&self, rack: &Rack) -> Result<PostResponse, Device42Error> {
        self.upsert("racks", &self.racks, rack, &rack.name, |r| {
            r.name == rack.name && r.room_id == rack.room_id && r.room == rack.room
        })
    }

    async fn delete_rack(&self, id: u64) -> Result<DeleteResponse, Device42Error> {
        self.delete("racks", &self.racks, id)
    }

    async fn get_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>, Device42Error> {
        Ok(self
            .devices
            .lock()
            .unwrap()
            .values()
            .filter(|d| {
                matches(filter.name.as_deref(), d.name.as_deref())
                    && matches(filter.device_type.as_deref(), d.device_type.as_deref())
                    && matches(filter.customer.as_deref(), d.customer.as_deref())
                    && matches(filter.serial_no.as_deref(), d.serial_no.as_deref())
                    && matches(filter.asset_no.as_deref(), d.asset_no.as_deref())
            })
            .cloned()
            .collect())
    }

    async fn get_all_devices(&self, _include_cols: Option<&str>) -> Result<Vec<Device>, Device42Error> {
        Ok(self.devices.lock().unwrap().values().cloned().collect())
    }

    async fn get_device(&self, id: u64) -> Result<Device, Device42Error> {
        self.get("devices", &self.devices, id)
    }

    async fn get_device_by_other_id(&self, lookup: DeviceLookup, value: &str, _include_cols: Option<&str>) -> Result<Vec<Device>, Device42Error> {
        Ok(self
            .devices
            .lock()
            .unwrap()
            .values()
            .filter(|d| {
                let field = match lookup {
                    DeviceLookup::Customer => d.customer.as_deref(),
                    DeviceLookup::Name => d.name.as_deref(),
                    DeviceLookup::Serial => d.serial_no.as_deref(),
                    DeviceLookup::Asset => d.asset_no.as_deref(),
                };
                field == Some(value)
            })
            .cloned()
            .collect())
    }

    async fn get_vlans(&self, filter: &VlanFilter) -> Result<Vec<Vlan>, Device42Error> {
        Ok(self
            .vlans
            .lock()
            .unwrap()
            .values()
            .filter(|v| {
                matches(filter.number.as_deref(), Some(v.number.as_str()))
                    && matches(filter.name.as_deref(), v.name.as_deref())
            })
            .cloned()
            .collect())
    }

    async fn post_vlan(&self, vlan: &Vlan) -> Result<PostResponse, Device42Error> {
        self.check_writable("vlans")?;
        let id = self.add_vlan(Vlan {
            vlan_id: None,
            ..vlan.clone()
        });
        Ok(PostResponse {
            message: "vlan added/updated.".to_string(),
            id,
            identifier: json!(vlan.number),
            created: Some(true),
            updated: Some(false),
        })
    }

    async fn post_network(&self, subnet: &Subnet) -> Result<PostResponse, Device42Error> {
        let identifier = format!("{}/{}", subnet.network, subnet.mask_bits);
        self.upsert("subnets", &self.subnets, subnet, &identifier, |s| {
            s.network == subnet.network && s.mask_bits == subnet.mask_bits
        })
    }

    async fn post_ip(&self, ip: &IpAddress) -> Result<PostResponse, Device42Error> {
        self.upsert("ips", &self.ips, ip, &ip.ipaddress.to_string(), |i| i.ipaddress == ip.ipaddress)
    }

    async fn get_all_service_instances(&self) -> Result<Vec<Value>, Device42Error> {
        Ok(self.service_instances.lock().unwrap().clone())
    }

    async fn get_all_application_components(&self) -> Result<Vec<Value>, Device42Error> {
        self.app_components
            .lock()
            .unwrap()
            .iter()
            .map(|(id, c)| -> Result<Value, Device42Error> {
                let mut value = serde_json::to_value(c)?;
                value["appcomp_id"] = json!(id);
                Ok(value)
            })
            .collect()
    }

    async fn get_all_operating_systems(&self) -> Result<Vec<Value>, Device42Error> {
        Ok(self.operating_systems.lock().unwrap().clone())
    }

    async fn post_app_component(&self, component: &AppComponent) -> Result<PostResponse, Device42Error> {
        self.upsert("appcomps", &self.app_components, component, &component.name, |c| {
            c.name == component.name
        })
    }

    async fn post_customer(&self, customer: &Customer) -> Result<PostResponse, Device42Error> {
        self.check_writable("customers")?;
        let mut store = self.customers.lock().unwrap();
        let existing = store.iter().find(|(_, c)| c.name == customer.name).map(|(k, _)| *k);
        let mut stored = customer.clone();
        if let Some(new_name) = stored.new_name.take() {
            stored.name = new_name;
        }
        let (id, created) = match existing {
            Some(id) => (id, false),
            None => (self.next_id(), true),
        };
        store.insert(id, stored);
        Ok(PostResponse {
            message: "customer added/updated.".to_string(),
            id,
            identifier: json!(customer.name),
            created: Some(created),
            updated: Some(!created),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_building_upserts_by_name() {
        let mock = MockDevice42Client::new("http://d42.test");

        let first = mock.post_building(&Building::new("HQ", "1 Main St")).await.unwrap();
        let second = mock.post_building(&Building::new("HQ", "2 Main St")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created, Some(true));
        assert_eq!(second.updated, Some(true));

        let buildings = mock.get_buildings(Some("HQ")).await.unwrap();
        assert_eq!(buildings.len(), 1);
        assert_eq!(buildings[0].address.as_deref(), Some("2 Main St"));
        assert_eq!(buildings[0].building_id, Some(first.id));
    }

    #[tokio::test]
    async fn test_generic_objects_through_trait() {
        let mock = MockDevice42Client::new("http://d42.test");
        let client: &dyn Device42ClientTrait = &mock;

        let created = client
            .post_object_value("patch_panels", &json!({"name": "PP-1", "ports": 24}))
            .await
            .unwrap();
        assert_eq!(created.created, Some(true));

        let updated = client
            .put_object_value("patch_panels", &json!({"name": "PP-1", "ports": 48}))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.updated, Some(true));

        let stored = client.get_object_value("patch_panels", created.id).await.unwrap();
        assert_eq!(stored["ports"], 48);

        assert!(matches!(
            client.put_object_value("patch_panels", &json!({"name": "PP-2"})).await,
            Err(Device42Error::NotFound(_))
        ));

        assert!(client.delete_object("patch_panels", created.id).await.unwrap().deleted);
        assert!(matches!(
            client.get_object_value("patch_panels", created.id).await,
            Err(Device42Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mock = MockDevice42Client::new("http://d42.test");
        assert!(matches!(
            mock.delete_rack(99).await,
            Err(Device42Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_vlans_are_always_created() {
        let mock = MockDevice42Client::new("http://d42.test");
        let vlan = Vlan {
            number: "100".to_string(),
            name: Some("users".to_string()),
            ..Default::default()
        };
        mock.post_vlan(&vlan).await.unwrap();
        mock.post_vlan(&vlan).await.unwrap();

        let found = mock
            .get_vlans(&VlanFilter {
                number: Some("100".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let mock = MockDevice42Client::new("http://d42.test");
        mock.fail_writes_to("customers", "name is required");
        assert!(matches!(
            mock.post_customer(&Customer::default()).await,
            Err(Device42Error::ReturnCode(msg)) if msg == "name is required"
        ));
    }

    #[tokio::test]
    async fn test_customer_rename() {
        let mock = MockDevice42Client::new("http://d42.test");
        let created = mock
            .post_customer(&Customer {
                name: "Acme".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let renamed = mock
            .post_customer(&Customer {
                name: "Acme".to_string(),
                new_name: Some("Acme Corp".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.id, renamed.id);
        let stored = mock.customers.lock().unwrap();
        assert_eq!(stored[&created.id].name, "Acme Corp");
    }
}
