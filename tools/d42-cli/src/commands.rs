//! Command execution
//!
//! Every command resolves to a JSON value that `main` prints.

use crate::cli::{Commands, DeviceArgs, DevicesArgs};
use anyhow::{Context, Result};
use device42_client::{
    CustomField, Device42ClientTrait, DeviceFilter, RackFilter, RoomFilter, VlanFilter,
};
use serde::Serialize;
use serde_json::{Value, json};

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("failed to encode result")
}

/// Run `command` against `client`
pub async fn run(client: &dyn Device42ClientTrait, command: Commands) -> Result<Value> {
    match command {
        Commands::Check => {
            client
                .validate_credentials()
                .await
                .with_context(|| format!("cannot reach {}", client.base_url()))?;
            Ok(json!({"host": client.base_url(), "status": "ok"}))
        }
        Commands::Buildings { name } => to_json(client.get_buildings(name.as_deref()).await?),
        Commands::Rooms { name, building } => {
            let filter = RoomFilter {
                name,
                building,
                ..Default::default()
            };
            to_json(client.get_rooms(&filter).await?)
        }
        Commands::Racks {
            name,
            building,
            room,
        } => {
            let filter = RackFilter {
                name,
                building,
                room,
                ..Default::default()
            };
            to_json(client.get_racks(&filter).await?)
        }
        Commands::Devices(args) => devices(client, args).await,
        Commands::Device(args) => device(client, args).await,
        Commands::Vlans { number } => {
            let filter = VlanFilter {
                number,
                ..Default::default()
            };
            to_json(client.get_vlans(&filter).await?)
        }
        Commands::Doql { name } => client
            .doql_query(&name)
            .await
            .with_context(|| format!("DOQL query '{}' failed", name)),
        Commands::ServiceInstances => to_json(client.get_all_service_instances().await?),
        Commands::AppComponents => to_json(client.get_all_application_components().await?),
        Commands::OperatingSystems => to_json(client.get_all_operating_systems().await?),
        Commands::CustomField(args) => {
            let field = CustomField::new(args.id, args.key, args.value);
            client
                .update_custom_field(&field, &args.endpoint)
                .await
                .with_context(|| format!("failed to update custom field on {} {}", args.endpoint, args.id))
        }
    }
}

async fn devices(client: &dyn Device42ClientTrait, args: DevicesArgs) -> Result<Value> {
    if args.all {
        return to_json(client.get_all_devices(args.include_cols.as_deref()).await?);
    }

    let filter = DeviceFilter {
        name: args.name,
        device_type: args.device_type,
        customer: args.customer,
        building: args.building,
        include_cols: args.include_cols,
        ..Default::default()
    };
    to_json(client.get_devices(&filter).await?)
}

async fn device(client: &dyn Device42ClientTrait, args: DeviceArgs) -> Result<Value> {
    match args.by {
        Some(lookup) => to_json(
            client
                .get_device_by_other_id(lookup, &args.key, args.include_cols.as_deref())
                .await?,
        ),
        None => {
            let id: u64 = args
                .key
                .parse()
                .with_context(|| format!("'{}' is not a device ID, use --by for other keys", args.key))?;
            to_json(client.get_device(id).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use device42_client::{Device, MockDevice42Client, Vlan};

    fn mock() -> MockDevice42Client {
        let client = MockDevice42Client::new("https://d42.test");
        client.add_device(Device {
            device_id: Some(5),
            name: Some("srv5".to_string()),
            serial_no: Some("SN5".to_string()),
            ..Default::default()
        });
        client.add_vlan(Vlan {
            number: "10".to_string(),
            name: Some("Office".to_string()),
            ..Default::default()
        });
        client
    }

    #[tokio::test]
    async fn test_device_by_id_and_by_serial() {
        let client = mock();

        let by_id = run(
            &client,
            Commands::Device(DeviceArgs {
                key: "5".to_string(),
                by: None,
                include_cols: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(by_id["name"], "srv5");

        let by_serial = run(
            &client,
            Commands::Device(DeviceArgs {
                key: "SN5".to_string(),
                by: Some(device42_client::DeviceLookup::Serial),
                include_cols: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(by_serial[0]["device_id"], 5);
    }

    #[tokio::test]
    async fn test_device_rejects_non_numeric_id() {
        let err = run(
            &mock(),
            Commands::Device(DeviceArgs {
                key: "srv5".to_string(),
                by: None,
                include_cols: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("--by"));
    }

    #[tokio::test]
    async fn test_vlans_filtered_by_number() {
        let client = mock();
        let found = run(&client, Commands::Vlans { number: Some("10".to_string()) }).await.unwrap();
        assert_eq!(found.as_array().map(Vec::len), Some(1));

        let none = run(&client, Commands::Vlans { number: Some("11".to_string()) }).await.unwrap();
        assert_eq!(none, json!([]));
    }

    #[tokio::test]
    async fn test_doql_passes_result_through() {
        let client = mock();
        client.set_doql_result("racks_by_room", json!([{"room": "A", "racks": 3}]));

        let rows = run(&client, Commands::Doql { name: "racks_by_room".to_string() }).await.unwrap();
        assert_eq!(rows[0]["racks"], 3);
    }

    #[tokio::test]
    async fn test_check_reports_host() {
        let status = run(&mock(), Commands::Check).await.unwrap();
        assert_eq!(status["host"], "https://d42.test");
    }
}
