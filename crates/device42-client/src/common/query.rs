//! Query utilities for the Device42 API
//!
//! Provides helpers for turning typed filters and payloads into key/value
//! pairs, and for walking Device42's offset pagination.
//!
//! Paginated responses look like:
//!
//! ```json
//! { "limit": 50, "offset": 0, "total_count": 123, "buildings": [ ... ] }
//! ```

use crate::common::{HttpClient, Params};
use crate::error::Device42Error;
use crate::models::lenient;
use futures::stream::{self, Stream, TryStreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Keys of a paginated response that are not the payload
const METADATA_KEYS: [&str; 3] = ["offset", "total_count", "limit"];

/// Convert a flat serializable value into key/value pairs
///
/// `null` fields are dropped, scalars are stringified and arrays are joined
/// with commas. Nested objects cannot be form-encoded and are rejected.
pub fn to_params<T: Serialize + ?Sized>(value: &T) -> Result<Params, Device42Error> {
    let object = match serde_json::to_value(value)? {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Device42Error::InvalidRequest(format!(
                "expected an object, got {}",
                other
            )));
        }
    };

    let mut params = Vec::with_capacity(object.len());
    for (key, value) in object {
        let rendered = match value {
            Value::Null => continue,
            Value::Array(items) => items
                .iter()
                .map(|item| scalar_to_string(&key, item))
                .collect::<Result<Vec<_>, _>>()?
                .join(","),
            scalar => scalar_to_string(&key, &scalar)?,
        };
        params.push((key, rendered));
    }
    Ok(params)
}

fn scalar_to_string(key: &str, value: &Value) -> Result<String, Device42Error> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(Device42Error::InvalidRequest(format!(
            "field '{}' cannot be form-encoded: {}",
            key, other
        ))),
    }
}

/// One page of a paginated response
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    /// `None` when the response was not paginated at all
    pub total_count: Option<u64>,
}

/// Extract the payload of a (possibly) paginated response
///
/// The payload is the non-metadata key holding a list (falling back to the
/// first non-metadata key). A bare list is a complete single page. An object
/// without any metadata key is a single resource, returned as one item.
pub fn extract_page(value: Value) -> Result<Page, Device42Error> {
    let mut object = match value {
        Value::Array(items) => {
            return Ok(Page {
                items,
                total_count: None,
            });
        }
        Value::Null => {
            return Ok(Page {
                items: Vec::new(),
                total_count: None,
            });
        }
        Value::Object(map) => map,
        other => {
            return Err(Device42Error::UnexpectedResponse(format!(
                "expected a paginated object, got {}",
                other
            )));
        }
    };

    if !METADATA_KEYS.iter().any(|k| object.contains_key(*k)) {
        return Ok(Page {
            items: vec![Value::Object(object)],
            total_count: None,
        });
    }

    let total_count = object.get("total_count").and_then(lenient::value_as_u64);

    let payload_key = object
        .iter()
        .find(|(k, v)| !METADATA_KEYS.contains(&k.as_str()) && v.is_array())
        .or_else(|| object.iter().find(|(k, _)| !METADATA_KEYS.contains(&k.as_str())))
        .map(|(k, _)| k.clone());

    let items = match payload_key.and_then(|k| object.remove(&k)) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![single],
    };

    Ok(Page { items, total_count })
}

/// State carried between page requests
struct Cursor {
    offset: u64,
    processed: u64,
    request_num: u32,
    done: bool,
}

/// Lazily fetch every page of a paginated endpoint
///
/// Requests `limit`/`offset` pages until `total_count` items were seen. An
/// empty first page ends the stream without yielding; an empty later page
/// also ends it (the collection shrank while being walked).
pub fn paginate<'a>(
    http: &'a HttpClient,
    path: &'a str,
    params: Params,
    limit: u32,
) -> impl Stream<Item = Result<Vec<Value>, Device42Error>> + 'a {
    let cursor = Cursor {
        offset: 0,
        processed: 0,
        request_num: 0,
        done: false,
    };

    stream::try_unfold(cursor, move |mut cursor| {
        let mut query = params.clone();
        async move {
            if cursor.done {
                return Ok::<_, Device42Error>(None);
            }

            query.push(("limit".to_string(), limit.to_string()));
            query.push(("offset".to_string(), cursor.offset.to_string()));
            cursor.request_num += 1;

            let page = extract_page(http.get(path, &query).await?)?;

            if page.items.is_empty() {
                if cursor.request_num > 1 {
                    warn!(
                        "{} returned an empty page at offset {} after {} items, stopping",
                        path, cursor.offset, cursor.processed
                    );
                }
                return Ok(None);
            }

            cursor.processed += page.items.len() as u64;
            debug!(
                "Processed request #{} [Offset: {} - Limit: {}] {}/{}",
                cursor.request_num,
                cursor.offset,
                limit,
                cursor.processed,
                page.total_count.map_or_else(|| "?".to_string(), |t| t.to_string())
            );

            match page.total_count {
                Some(total) if cursor.processed < total => cursor.offset += u64::from(limit),
                _ => cursor.done = true,
            }

            Ok(Some((page.items, cursor)))
        }
    })
}

/// Fetch all pages and flatten them into a list of `T`
pub async fn query_resources<T: DeserializeOwned>(
    http: &HttpClient,
    path: &str,
    params: Params,
    limit: u32,
) -> Result<Vec<T>, Device42Error> {
    let pages: Vec<Vec<Value>> = paginate(http, path, params, limit).try_collect().await?;

    pages
        .into_iter()
        .flatten()
        .map(|item| serde_json::from_value(item).map_err(Device42Error::Serialization))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Filter {
        name: Option<String>,
        building_id: Option<u64>,
        tags: Vec<String>,
        active: bool,
    }

    #[test]
    fn test_to_params_skips_none_and_joins_lists() {
        let params = to_params(&Filter {
            name: Some("HQ".to_string()),
            building_id: None,
            tags: vec!["a".to_string(), "b".to_string()],
            active: true,
        })
        .unwrap();

        assert!(params.contains(&("name".to_string(), "HQ".to_string())));
        assert!(params.contains(&("tags".to_string(), "a,b".to_string())));
        assert!(params.contains(&("active".to_string(), "true".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "building_id"));
    }

    #[test]
    fn test_to_params_rejects_nested_objects() {
        let err = to_params(&json!({"name": "x", "nested": {"a": 1}})).unwrap_err();
        assert!(matches!(err, Device42Error::InvalidRequest(_)));
        assert!(to_params(&json!("scalar")).is_err());
    }

    #[test]
    fn test_extract_page_paginated() {
        let page = extract_page(json!({
            "limit": 2,
            "offset": 0,
            "total_count": 3,
            "buildings": [{"name": "a"}, {"name": "b"}]
        }))
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, Some(3));
    }

    #[test]
    fn test_extract_page_prefers_list_payload() {
        let page = extract_page(json!({
            "total_count": "1",
            "Devices": [{"name": "srv1"}],
            "ahead_alphabetically": "noise"
        }))
        .unwrap();
        assert_eq!(page.items, vec![json!({"name": "srv1"})]);
        assert_eq!(page.total_count, Some(1));
    }

    #[test]
    fn test_extract_page_empty_payload() {
        let page = extract_page(json!({"limit": 50, "offset": 0, "total_count": 0, "racks": []})).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_extract_page_bare_list_and_single_object() {
        let page = extract_page(json!([{"a": 1}, {"a": 2}])).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, None);

        let page = extract_page(json!({"device_id": 4, "name": "srv"})).unwrap();
        assert_eq!(page.items, vec![json!({"device_id": 4, "name": "srv"})]);
        assert_eq!(page.total_count, None);
    }
}
