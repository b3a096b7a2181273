//! Infoblox WAPI objects

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Status filter for `ipv4address` queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AddressStatus {
    Used,
    Unused,
}

impl AddressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressStatus::Used => "USED",
            AddressStatus::Unused => "UNUSED",
        }
    }
}

/// Value of an extensible attribute
///
/// The `VLAN` attribute holds either a single number or a hyphenated range
/// (`"100-104"`); parsing is left to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
}

/// Extensible attributes of a network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtAttrs {
    #[serde(rename = "VLAN", default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<ExtraInfo>,
    #[serde(rename = "Site", default, skip_serializing_if = "Option::is_none")]
    pub site: Option<ExtraInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `network` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "_ref")]
    pub reference: String,
    /// CIDR, e.g. `10.0.0.0/24`
    pub network: String,
    #[serde(default)]
    pub network_view: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extattrs: Option<ExtAttrs>,
}

impl Network {
    /// Raw `VLAN` extensible attribute, if the network carries one
    pub fn vlan_value(&self) -> Option<&str> {
        self.extattrs
            .as_ref()
            .and_then(|attrs| attrs.vlan.as_ref())
            .map(|info| info.value.as_str())
    }

    /// File name stem for per-network exports (`/` is not allowed in file names)
    pub fn file_stem(&self) -> String {
        self.network.replace('/', "_to_")
    }
}

/// `ipv4address` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ipv4Address {
    #[serde(rename = "_ref")]
    pub reference: String,
    pub ip_address: String,
    #[serde(default)]
    pub is_conflict: bool,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub names: Vec<String>,
    pub network: String,
    #[serde(default)]
    pub network_view: String,
    #[serde(default)]
    pub objects: Vec<String>,
    pub status: AddressStatus,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub usage: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_network_with_vlan_attribute() {
        let network: Network = serde_json::from_value(json!({
            "_ref": "network/ZG5z:10.0.0.0/24/default",
            "network": "10.0.0.0/24",
            "network_view": "default",
            "comment": "Office LAN",
            "extattrs": {"VLAN": {"value": "100-102"}, "Owner": {"value": "ops"}}
        }))
        .unwrap();

        assert_eq!(network.vlan_value(), Some("100-102"));
        assert_eq!(network.file_stem(), "10.0.0.0_to_24");
        let attrs = network.extattrs.as_ref().unwrap();
        assert!(attrs.extra.contains_key("Owner"));
    }

    #[test]
    fn test_network_without_attributes_round_trips_ref() {
        let network: Network = serde_json::from_value(json!({
            "_ref": "network/abc",
            "network": "10.1.0.0/16"
        }))
        .unwrap();
        assert_eq!(network.vlan_value(), None);
        assert_eq!(network.network_view, "");

        let value = serde_json::to_value(&network).unwrap();
        assert_eq!(value["_ref"], "network/abc");
        assert!(value.get("comment").is_none());
    }

    #[test]
    fn test_numeric_vlan_value() {
        let info: ExtraInfo = serde_json::from_value(json!({"value": 42})).unwrap();
        assert_eq!(info.value, "42");
    }

    #[test]
    fn test_ipv4_address() {
        let address: Ipv4Address = serde_json::from_value(json!({
            "_ref": "ipv4address/xyz:10.0.0.5",
            "ip_address": "10.0.0.5",
            "is_conflict": false,
            "mac_address": "00:11:22:33:44:55",
            "names": ["printer.example.com"],
            "network": "10.0.0.0/24",
            "network_view": "default",
            "objects": [],
            "status": "USED",
            "types": ["HOST"],
            "usage": ["DNS"],
            "discovered_data": {"os": "Linux"}
        }))
        .unwrap();
        assert_eq!(address.status, AddressStatus::Used);
        assert_eq!(address.discovered_data, Some(json!({"os": "Linux"})));
    }
}
