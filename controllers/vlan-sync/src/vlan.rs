//! VLAN import from Infoblox networks into Device42
//!
//! Every Infoblox network carrying a `VLAN` extensible attribute yields one
//! Device42 VLAN per number in that attribute. Infoblox data is hand-entered,
//! so the attribute may hold a single number, an inclusive range (`100-104`)
//! or garbage; garbage is reported and skipped.

use crate::error::SyncError;
use device42_client::{Device42ClientTrait, Vlan, VlanFilter};
use infoblox_client::Network;
use std::fmt;
use tracing::{debug, info, warn};

/// Notes attached to every generated VLAN
pub const GENERATED_NOTES: &str =
    "Warning This entry was automatically generated by a script that queries Infoblox! Use with caution";

/// Prefix added to the notes when the VLAN number is already taken
pub const DUPLICATE_NUMBER_WARNING: &str =
    "Warning: Two VLANS have the same number! This is likely a mistake\n";

/// Why a `VLAN` attribute value could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVlanValue(pub String);

impl fmt::Display for InvalidVlanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is neither a VLAN number nor a range", self.0)
    }
}

/// Expand a `VLAN` attribute value into VLAN numbers
///
/// `"N"` yields `[N]`, `"A-B"` yields `A..=B`. A reversed range is invalid.
pub fn parse_vlan_numbers(value: &str) -> Result<Vec<u32>, InvalidVlanValue> {
    let invalid = || InvalidVlanValue(value.to_string());
    let parse = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

    match value.split('-').collect::<Vec<_>>().as_slice() {
        [single] => Ok(vec![parse(single)?]),
        [start, end] => {
            let (start, end) = (parse(start)?, parse(end)?);
            if start > end {
                return Err(invalid());
            }
            Ok((start..=end).collect())
        }
        _ => Err(invalid()),
    }
}

/// VLAN payload describing `network`
pub fn vlan_for_network(network: &Network, number: u32) -> Vlan {
    Vlan {
        number: number.to_string(),
        name: Some(network.comment.clone().unwrap_or_default()),
        description: Some(format!("Vlan for subnetwork {}", network.network)),
        notes: Some(GENERATED_NOTES.to_string()),
        ..Default::default()
    }
}

/// Whether `candidate` differs from every existing VLAN with its number
///
/// Two VLANs are the same when name and description match; notes and IDs
/// are ignored.
pub fn needs_new_vlan(existing: &[Vlan], candidate: &Vlan) -> bool {
    let key = |v: &Vlan| {
        (
            v.name.clone().unwrap_or_default(),
            v.description.clone().unwrap_or_default(),
        )
    };
    let wanted = key(candidate);
    !existing.iter().any(|v| key(v) == wanted)
}

/// Outcome counters of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub skipped: usize,
    pub invalid: usize,
    /// Networks without a `VLAN` attribute
    pub without_vlan: usize,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} already present, {} invalid, {} networks without VLAN",
            self.created, self.skipped, self.invalid, self.without_vlan
        )
    }
}

/// Import the VLANs of a single network
pub async fn import_network<C>(
    client: &C,
    network: &Network,
    report: &mut ImportReport,
) -> Result<(), SyncError>
where
    C: Device42ClientTrait + ?Sized,
{
    let Some(value) = network.vlan_value() else {
        report.without_vlan += 1;
        return Ok(());
    };

    let numbers = match parse_vlan_numbers(value) {
        Ok(numbers) => numbers,
        Err(e) => {
            warn!("Could not transfer VLAN of network {}: {}", network.network, e);
            report.invalid += 1;
            return Ok(());
        }
    };

    for number in numbers {
        let mut vlan = vlan_for_network(network, number);

        let existing = client
            .get_vlans(&VlanFilter {
                number: Some(vlan.number.clone()),
                ..Default::default()
            })
            .await?;

        if !needs_new_vlan(&existing, &vlan) {
            debug!("VLAN {} for {} already present", number, network.network);
            report.skipped += 1;
            continue;
        }

        if !existing.is_empty() {
            warn!(
                "VLAN number {} already used by {} other VLAN(s), creating a duplicate for {}",
                number,
                existing.len(),
                network.network
            );
            vlan.notes = Some(format!("{}{}", DUPLICATE_NUMBER_WARNING, GENERATED_NOTES));
        }

        let res = client.post_vlan(&vlan).await?;
        info!("Created VLAN {} for {} (ID: {})", number, network.network, res.id);
        report.created += 1;
    }

    Ok(())
}

/// Import the VLANs of every network
pub async fn import_vlans<C>(client: &C, networks: &[Network]) -> Result<ImportReport, SyncError>
where
    C: Device42ClientTrait + ?Sized,
{
    let mut report = ImportReport::default();
    for network in networks {
        debug!("Checking out {}", network.network);
        import_network(client, network, &mut report).await?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use device42_client::{Device42Error, MockDevice42Client};
    use serde_json::json;

    fn network(cidr: &str, comment: Option<&str>, vlan: Option<&str>) -> Network {
        let mut value = json!({
            "_ref": format!("network/{}", cidr),
            "network": cidr,
            "network_view": "internal"
        });
        if let Some(comment) = comment {
            value["comment"] = json!(comment);
        }
        if let Some(vlan) = vlan {
            value["extattrs"] = json!({"VLAN": {"value": vlan}});
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_vlan_numbers() {
        assert_eq!(parse_vlan_numbers("42"), Ok(vec![42]));
        assert_eq!(parse_vlan_numbers(" 7 "), Ok(vec![7]));
        assert_eq!(parse_vlan_numbers("100-103"), Ok(vec![100, 101, 102, 103]));
        assert_eq!(parse_vlan_numbers("5-5"), Ok(vec![5]));
    }

    #[test]
    fn test_parse_vlan_numbers_rejects_garbage() {
        for value in ["", "abc", "10-", "-10", "1-2-3", "20-10", "10/20"] {
            assert!(parse_vlan_numbers(value).is_err(), "{} should be invalid", value);
        }
    }

    #[test]
    fn test_vlan_payload() {
        let vlan = vlan_for_network(&network("10.0.0.0/24", Some("Office"), Some("10")), 10);
        assert_eq!(vlan.number, "10");
        assert_eq!(vlan.name.as_deref(), Some("Office"));
        assert_eq!(vlan.description.as_deref(), Some("Vlan for subnetwork 10.0.0.0/24"));
        assert_eq!(vlan.notes.as_deref(), Some(GENERATED_NOTES));

        let unnamed = vlan_for_network(&network("10.0.1.0/24", None, Some("11")), 11);
        assert_eq!(unnamed.name.as_deref(), Some(""));
    }

    #[test]
    fn test_needs_new_vlan_compares_name_and_description() {
        let candidate = vlan_for_network(&network("10.0.0.0/24", Some("Office"), None), 10);
        assert!(needs_new_vlan(&[], &candidate));

        let same = Vlan {
            notes: Some("edited by hand".to_string()),
            vlan_id: Some(3),
            ..candidate.clone()
        };
        assert!(!needs_new_vlan(&[same], &candidate));

        let other = Vlan {
            name: Some("Lab".to_string()),
            ..candidate.clone()
        };
        assert!(needs_new_vlan(&[other], &candidate));
    }

    #[tokio::test]
    async fn test_import_expands_ranges_and_skips_known() {
        let client = MockDevice42Client::new("https://d42.test");
        let networks = vec![
            network("10.0.0.0/24", Some("Office"), Some("100-102")),
            network("10.0.1.0/24", Some("Lab"), Some("bogus")),
            network("10.0.2.0/24", None, None),
        ];

        let report = import_vlans(&client, &networks).await.unwrap();
        assert_eq!(
            report,
            ImportReport {
                created: 3,
                skipped: 0,
                invalid: 1,
                without_vlan: 1
            }
        );

        let mut numbers: Vec<_> = client.vlans().into_iter().map(|v| v.number).collect();
        numbers.sort();
        assert_eq!(numbers, vec!["100", "101", "102"]);

        // Running again changes nothing
        let report = import_vlans(&client, &networks).await.unwrap();
        assert_eq!(report.created, 0);
        assert_eq!(report.skipped, 3);
        assert_eq!(client.vlans().len(), 3);
    }

    #[tokio::test]
    async fn test_import_flags_duplicate_numbers() {
        let client = MockDevice42Client::new("https://d42.test");
        client.add_vlan(Vlan {
            number: "200".to_string(),
            name: Some("Existing".to_string()),
            description: Some("hand made".to_string()),
            ..Default::default()
        });

        let report = import_vlans(&client, &[network("10.9.0.0/24", Some("DMZ"), Some("200"))])
            .await
            .unwrap();
        assert_eq!(report.created, 1);

        let created = client
            .vlans()
            .into_iter()
            .find(|v| v.name.as_deref() == Some("DMZ"))
            .unwrap();
        let notes = created.notes.unwrap();
        assert!(notes.starts_with(DUPLICATE_NUMBER_WARNING));
        assert!(notes.ends_with(GENERATED_NOTES));
    }

    #[tokio::test]
    async fn test_import_stops_on_device42_error() {
        let client = MockDevice42Client::new("https://d42.test");
        client.fail_writes_to("vlans", "vlan number out of range");

        let err = import_vlans(&client, &[network("10.0.0.0/24", None, Some("5000"))])
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Device42(Device42Error::ReturnCode(_))));
    }
}
