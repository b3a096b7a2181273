//! Infoblox WAPI client

use crate::config::InfobloxConfig;
use crate::error::InfobloxError;
use crate::models::{AddressStatus, Ipv4Address, Network};
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Infoblox rejects paged requests above this size
pub const MAX_RESULTS: u32 = 100;

/// Query parameters as ordered key/value pairs
pub type Params = Vec<(String, String)>;

/// One page of a paged WAPI response
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub result: Vec<Value>,
    pub next_page_id: Option<String>,
}

impl ResultPage {
    /// Decode `{"result": [...], "next_page_id": "..."}`
    ///
    /// A `result` holding a single object is treated as a one-item page, and
    /// a bare list (`_return_as_object` ignored) as the last page.
    pub fn from_value(value: Value) -> Self {
        let mut value = match value {
            Value::Array(items) => {
                return Self {
                    result: items,
                    next_page_id: None,
                };
            }
            other => other,
        };

        let next_page_id = value
            .get("next_page_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let result = match value.get_mut("result").map(Value::take) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single],
        };

        Self {
            result,
            next_page_id,
        }
    }
}

/// Infoblox WAPI client
#[derive(Clone)]
pub struct InfobloxClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for InfobloxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfobloxClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl InfobloxClient {
    /// Create a new Infoblox client
    pub fn new(config: &InfobloxConfig) -> Result<Self, InfobloxError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            client,
            base_url: config.host.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Create a client from `INFOBLOX_*` environment variables
    pub fn from_env() -> Result<Self, InfobloxError> {
        Self::new(&InfobloxConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a WAPI object type
    pub async fn get(&self, object: &str, query: &[(String, String)]) -> Result<Value, InfobloxError> {
        let url = format!("{}/{}", self.base_url, object.trim_start_matches('/'));
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(InfobloxError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Lazily fetch every page of an object query
    ///
    /// The first request asks for a paged result object; every following
    /// request only carries the `_page_id` handed back by the previous one.
    pub fn paginate<'a>(
        &'a self,
        object: &'a str,
        params: Params,
    ) -> impl Stream<Item = Result<Vec<Value>, InfobloxError>> + 'a {
        let mut first = params;
        first.push(("_paging".to_string(), "1".to_string()));
        first.push(("_return_as_object".to_string(), "1".to_string()));
        first.push(("_max_results".to_string(), MAX_RESULTS.to_string()));

        stream::try_unfold(Some(first), move |query| async move {
            let Some(query) = query else {
                return Ok::<_, InfobloxError>(None);
            };

            let page = ResultPage::from_value(self.get(object, &query).await?);
            debug!(
                "{}: {} results, next page: {}",
                object,
                page.result.len(),
                page.next_page_id.is_some()
            );

            let next = page
                .next_page_id
                .map(|id| vec![("_page_id".to_string(), id)]);
            Ok(Some((page.result, next)))
        })
    }

    /// Fetch all pages and decode them into `T`
    pub async fn query_all<T: DeserializeOwned>(
        &self,
        object: &str,
        params: Params,
    ) -> Result<Vec<T>, InfobloxError> {
        let pages: Vec<Vec<Value>> = self.paginate(object, params).try_collect().await?;
        pages
            .into_iter()
            .flatten()
            .map(|item| serde_json::from_value(item).map_err(InfobloxError::from))
            .collect()
    }

    /// All networks of a network view, with their extensible attributes
    pub async fn query_networks(&self, network_view: &str) -> Result<Vec<Network>, InfobloxError> {
        let params = vec![
            (
                "_return_fields+".to_string(),
                "network,extattrs,network_view".to_string(),
            ),
            ("network_view".to_string(), network_view.to_string()),
        ];
        self.query_all("network", params).await
    }

    /// Used IPv4 addresses of a network, including discovered data
    ///
    /// With `only_with_mac` only addresses that have a MAC address are
    /// returned, which in practice means physical machines.
    pub async fn query_ipv4_addresses(
        &self,
        network: &Network,
        only_with_mac: bool,
    ) -> Result<Vec<Ipv4Address>, InfobloxError> {
        let mut params = vec![
            ("network".to_string(), network.network.clone()),
            ("network_view".to_string(), network.network_view.clone()),
            ("status".to_string(), AddressStatus::Used.as_str().to_string()),
            ("_return_fields+".to_string(), "discovered_data".to_string()),
        ];
        if only_with_mac {
            params.push(("mac_address~".to_string(), ".+".to_string()));
        }
        self.query_all("ipv4address", params).await
    }
}
