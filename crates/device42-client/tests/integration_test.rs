//! Integration tests for the Device42 client
//!
//! These tests require a running Device42 instance.
//! Set D42_HOST, D42_USERNAME and D42_PASSWORD environment variables to run.

use device42_client::{Device42Client, Device42Config, DeviceFilter, RackFilter};

fn client() -> Device42Client {
    let config = Device42Config::from_env().expect("D42_* environment variables must be set");
    Device42Client::new(&config).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running Device42 instance
async fn test_validate_credentials() {
    client()
        .validate_credentials()
        .await
        .expect("Failed to validate credentials");
}

#[tokio::test]
#[ignore]
async fn test_query_buildings() {
    let buildings = client().get_buildings(None).await
        .expect("Failed to query buildings");

    println!("Found {} buildings", buildings.len());
}

#[tokio::test]
#[ignore]
async fn test_query_racks() {
    let racks = client().get_racks(&RackFilter::default()).await
        .expect("Failed to query racks");

    println!("Found {} racks", racks.len());
}

#[tokio::test]
#[ignore]
async fn test_query_devices_with_limited_columns() {
    let devices = client()
        .get_devices(&DeviceFilter {
            include_cols: Some("device_id,name".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to query devices");

    println!("Found {} devices", devices.len());
}

#[tokio::test]
#[ignore]
async fn test_query_operating_systems() {
    let systems = client().get_all_operating_systems().await
        .expect("Failed to query operating systems");

    println!("Found {} operating systems", systems.len());
}
