//! Device42 API models
//!
//! Payload models are sent form-encoded, so they stay flat: optional fields
//! are skipped when unset and nested values are not allowed. The same structs
//! are used to read objects back; fields Device42 returns that are not modelled
//! here land in `extra`.
//!
//! See: <https://api.device42.com/>

use crate::error::Device42Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::IpAddr;

/// Envelope returned by POST and PUT requests
///
/// A `code` of 0 means success; otherwise `msg` explains the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(deserialize_with = "lenient::i64")]
    pub code: i64,
    #[serde(default)]
    pub msg: Value,
}

impl ApiResponse {
    /// Return `msg` on success, or a [`Device42Error::ReturnCode`] built from it
    pub fn into_result(self) -> Result<Value, Device42Error> {
        if self.code == 0 {
            return Ok(self.msg);
        }
        Err(Device42Error::ReturnCode(join_message(&self.msg)))
    }
}

/// Flatten a `msg` value into a single line
pub(crate) fn join_message(msg: &Value) -> String {
    match msg {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Result of a successful POST/PUT
///
/// Device42 answers with a positional list: `[message, id, identifier]`,
/// optionally followed by `created` and `updated` flags. `message` reads
/// either `<object> added or updated` or `<object> added/updated`. `id` is
/// the database key, `identifier` is how the caller identified the object
/// (usually its name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub message: String,
    pub id: u64,
    pub identifier: Value,
    pub created: Option<bool>,
    pub updated: Option<bool>,
}

impl PostResponse {
    /// Decode the `msg` list of a POST/PUT envelope
    pub fn from_msg(msg: &Value) -> Result<Self, Device42Error> {
        let items = msg.as_array().ok_or_else(|| {
            Device42Error::UnexpectedResponse(format!("expected a list in msg, got: {}", msg))
        })?;

        let message = match items.first() {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => {
                return Err(Device42Error::UnexpectedResponse(
                    "empty msg list".to_string(),
                ));
            }
        };

        let id = items
            .get(1)
            .and_then(lenient::value_as_u64)
            .ok_or_else(|| {
                Device42Error::UnexpectedResponse(format!("missing object id in msg: {}", msg))
            })?;

        Ok(Self {
            message,
            id,
            identifier: items.get(2).cloned().unwrap_or(Value::Null),
            created: items.get(3).and_then(Value::as_bool),
            updated: items.get(4).and_then(Value::as_bool),
        })
    }
}

/// Result of a DELETE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    #[serde(deserialize_with = "lenient::u64")]
    pub id: u64,
}

/// Generic `yes`/`no` flag used by the API
///
/// Reads also accept JSON booleans, which is what Device42 returns for
/// some of these fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

impl<'de> Deserialize<'de> for YesNo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(b.into()),
            Value::String(s) if s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("true") => {
                Ok(YesNo::Yes)
            }
            Value::String(s) if s.eq_ignore_ascii_case("no") || s.eq_ignore_ascii_case("false") => {
                Ok(YesNo::No)
            }
            other => Err(serde::de::Error::custom(format!(
                "expected yes/no, got {}",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Buildings, rooms, racks
// ---------------------------------------------------------------------------

/// Building
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Admin groups when multitenancy is on, e.g. `"Prod_East:no,Corp:yes"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_u64")]
    pub building_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Building {
    /// Building with the two fields Device42 requires on creation
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: Some(address.into()),
            ..Default::default()
        }
    }
}

/// Grid numbering scheme of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridNumbering {
    #[serde(alias = "Numeric")]
    Numeric,
    #[serde(alias = "Alphabetic")]
    Alphabetic,
}

/// Unit of measurement for room dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitOfMeasure {
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "in")]
    Inches,
}

/// Room inside a building
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_u64")]
    pub building_id: Option<u64>,
    /// Defaults to numeric on the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_grid_numbering: Option<GridNumbering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_grid_numbering: Option<GridNumbering>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub horizontal_grid_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub vertical_grid_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<UnitOfMeasure>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub grid_rows: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub grid_cols: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raised_floor: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub raised_floor_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_xaxis: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_yaxis: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_u64")]
    pub room_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Filters for `GET /api/1.0/rooms/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

/// Rack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rack {
    pub name: String,
    /// Height in rack units
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_u64")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_u64")]
    pub room_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub row: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering_start_from_bottom: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_u64")]
    pub rack_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Filters for `GET /api/1.0/racks/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct RackFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// Device as returned by the devices endpoints
///
/// Devices carry a large, instance-specific set of columns; only the
/// identifying ones are modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_u64")]
    pub device_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /api/1.0/devices/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack: Option<String>,
    /// Comma separated list of columns to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_cols: Option<String>,
}

/// Secondary keys a device can be looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceLookup {
    Customer,
    Name,
    Serial,
    Asset,
}

impl DeviceLookup {
    /// Path segment used by `/api/1.0/devices/{kind}/{value}/`
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceLookup::Customer => "customer",
            DeviceLookup::Name => "name",
            DeviceLookup::Serial => "serial",
            DeviceLookup::Asset => "asset",
        }
    }
}

impl std::str::FromStr for DeviceLookup {
    type Err = Device42Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(DeviceLookup::Customer),
            "name" => Ok(DeviceLookup::Name),
            "serial" => Ok(DeviceLookup::Serial),
            "asset" => Ok(DeviceLookup::Asset),
            other => Err(Device42Error::InvalidRequest(format!(
                "unknown device lookup '{}', expected customer, name, serial or asset",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// IPAM
// ---------------------------------------------------------------------------

/// VLAN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    #[serde(deserialize_with = "lenient::string")]
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_u64")]
    pub vlan_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /api/1.0/vlans/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct VlanFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Subnet (posted to `/api/1.0/subnets/`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    pub network: String,
    #[serde(deserialize_with = "lenient::string")]
    pub mask_bits: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// How an IP address was assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpAssignment {
    Static,
    Dhcp,
    Reserved,
}

/// IP address (posted to `/api/1.0/ips/`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAddress {
    pub ipaddress: IpAddr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macaddress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<IpAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_all: Option<YesNo>,
    /// Comma separated tag names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl IpAddress {
    pub fn new(ipaddress: IpAddr) -> Self {
        Self {
            ipaddress,
            label: None,
            subnet: None,
            macaddress: None,
            device: None,
            assignment: None,
            vrf_group_id: None,
            vrf_group: None,
            available: None,
            clear_all: None,
            tags: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Applications, customers, custom fields
// ---------------------------------------------------------------------------

/// Application component (posted to `/api/1.0/appcomps/`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppComponent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_owner: Option<String>,
    /// Business impact of losing the component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
    /// Comma separated list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_reason: Option<String>,
    /// `name1:reason1, name2:reason2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on_reasons: Option<String>,
}

/// Kind of customer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Customer,
    Department,
}

/// Customer or department (posted to `/api/1.0/customers/`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<CustomerType>,
    /// Renames the customer identified by `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    /// Admin groups when multitenancy is on. Present but empty removes all groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
}

/// Custom field update for any Device42 object
///
/// `value` is always a string; structured values must be JSON-encoded first
/// (see [`CustomField::json`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    /// ID of the object being edited
    pub id: u64,
    pub key: String,
    pub value: String,
}

impl CustomField {
    pub fn new(id: u64, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Custom field whose value is the JSON encoding of `value`
    pub fn json<T: Serialize + ?Sized>(
        id: u64,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, Device42Error> {
        Ok(Self::new(id, key, serde_json::to_string(value)?))
    }
}

/// Service instance custom field as returned by a DOQL query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstanceCustomField {
    #[serde(deserialize_with = "lenient::u64")]
    pub id: u64,
    pub key: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub serviceinstance_fk: Option<u64>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub type_id: Option<u64>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub related_model_name: Option<Value>,
    #[serde(default)]
    pub filterable: Option<bool>,
    #[serde(default)]
    pub mandatory: Option<bool>,
    #[serde(default)]
    pub log_for_api: Option<bool>,
    #[serde(default)]
    pub is_multi: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Deserializers tolerant of Device42 returning numbers as strings and vice versa
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn value_as_u64(value: &Value) -> Option<u64> {
        match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn value_as_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        value_as_u64(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {}", value)))
    }

    pub fn i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        value_as_i64(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {}", value)))
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            value => value_as_u64(&value).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("expected an integer, got {}", value))
            }),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(serde::de::Error::custom(format!("expected a string, got {}", other))),
        }
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(serde::de::Error::custom(format!("expected a string, got {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_response_from_msg() {
        let msg = json!(["building added/updated.", 12, "HQ", true, false]);
        let res = PostResponse::from_msg(&msg).unwrap();
        assert_eq!(res.message, "building added/updated.");
        assert_eq!(res.id, 12);
        assert_eq!(res.identifier, json!("HQ"));
        assert_eq!(res.created, Some(true));
        assert_eq!(res.updated, Some(false));
    }

    #[test]
    fn test_post_response_without_flags_and_string_id() {
        let msg = json!(["subnet added or updated", "7", "10.0.0.0/24"]);
        let res = PostResponse::from_msg(&msg).unwrap();
        assert_eq!(res.id, 7);
        assert_eq!(res.created, None);
        assert_eq!(res.updated, None);
    }

    #[test]
    fn test_post_response_rejects_non_list() {
        assert!(PostResponse::from_msg(&json!("oops")).is_err());
        assert!(PostResponse::from_msg(&json!([])).is_err());
        assert!(PostResponse::from_msg(&json!(["no id"])).is_err());
    }

    #[test]
    fn test_api_response_return_code() {
        let ok: ApiResponse = serde_json::from_value(json!({"code": 0, "msg": ["fine", 1]})).unwrap();
        assert_eq!(ok.into_result().unwrap(), json!(["fine", 1]));

        let failed: ApiResponse =
            serde_json::from_value(json!({"code": "1", "msg": ["name", "is required"]})).unwrap();
        match failed.into_result() {
            Err(Device42Error::ReturnCode(msg)) => assert_eq!(msg, "name is required"),
            other => panic!("expected ReturnCode, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_response_accepts_string_id() {
        let res: DeleteResponse = serde_json::from_value(json!({"deleted": true, "id": "5"})).unwrap();
        assert_eq!(res, DeleteResponse { deleted: true, id: 5 });
    }

    #[test]
    fn test_building_roundtrip_keeps_unknown_fields() {
        let value = json!({
            "name": "HQ",
            "address": "1 Main St",
            "building_id": 3,
            "latitude": 49.6,
            "custom_fields": []
        });
        let building: Building = serde_json::from_value(value).unwrap();
        assert_eq!(building.building_id, Some(3));
        assert_eq!(building.latitude.as_deref(), Some("49.6"));
        assert!(building.extra.contains_key("custom_fields"));
    }

    #[test]
    fn test_building_payload_skips_unset_fields() {
        let value = serde_json::to_value(Building::new("HQ", "1 Main St")).unwrap();
        assert_eq!(value, json!({"name": "HQ", "address": "1 Main St"}));
    }

    #[test]
    fn test_yes_no_accepts_bools() {
        let room: Room = serde_json::from_value(json!({
            "name": "R1",
            "raised_floor": true,
            "reverse_xaxis": "no",
            "uom": "m",
            "horizontal_grid_numbering": "Alphabetic"
        }))
        .unwrap();
        assert_eq!(room.raised_floor, Some(YesNo::Yes));
        assert_eq!(room.reverse_xaxis, Some(YesNo::No));
        assert_eq!(room.uom, Some(UnitOfMeasure::Meters));
        assert_eq!(room.horizontal_grid_numbering, Some(GridNumbering::Alphabetic));
    }

    #[test]
    fn test_ip_address_serializes_type() {
        let mut ip = IpAddress::new("10.1.2.3".parse().unwrap());
        ip.assignment = Some(IpAssignment::Dhcp);
        ip.available = Some(YesNo::No);
        let value = serde_json::to_value(&ip).unwrap();
        assert_eq!(
            value,
            json!({"ipaddress": "10.1.2.3", "type": "dhcp", "available": "no"})
        );
    }

    #[test]
    fn test_custom_field_json_value() {
        let cf = CustomField::json(12, "custom_data", &json!({"Testing": "from the API"})).unwrap();
        assert_eq!(cf.value, r#"{"Testing":"from the API"}"#);
    }

    #[test]
    fn test_device_lookup_parse() {
        assert_eq!("serial".parse::<DeviceLookup>().unwrap(), DeviceLookup::Serial);
        assert!("mac".parse::<DeviceLookup>().is_err());
    }
}
