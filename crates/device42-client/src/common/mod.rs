//! Common utilities for the Device42 API client
//!
//! Provides the authenticated transport shared by all endpoint methods.

pub mod query;

use crate::backoff::FibonacciBackoff;
use crate::config::Device42Config;
use crate::error::Device42Error;
use crate::models::ApiResponse;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

/// Query string or form body as ordered key/value pairs
pub type Params = Vec<(String, String)>;

/// HTTP client wrapper with authentication and retry handling
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    max_retries: u32,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper from a configuration
    pub fn new(config: &Device42Config) -> Result<Self, Device42Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(Device42Error::Http)?;

        Ok(Self {
            client,
            base_url: config.host.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path and query parameters
    pub fn build_url(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = if path.starts_with("http") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        let query_string = build_query_string(query);
        if !query_string.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query_string);
        }
        url
    }

    /// Send a request and return the decoded JSON body
    ///
    /// Connection failures are retried up to `max_retries` times with a
    /// Fibonacci backoff. POST and PUT responses are unwrapped from their
    /// `{code, msg}` envelope, so callers receive `msg`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        form: Option<&[(String, String)]>,
    ) -> Result<Value, Device42Error> {
        let url = self.build_url(path, query);
        let mut backoff = FibonacciBackoff::default();
        let mut attempt = 0;

        let response = loop {
            debug!("{} {}", method, url);

            let mut builder = self
                .client
                .request(method.clone(), &url)
                .basic_auth(&self.username, Some(&self.password))
                .header("Accept", "application/json");
            if let Some(form) = form {
                builder = builder.form(form);
            }

            match builder.send().await.map_err(Device42Error::Http) {
                Ok(response) => break response,
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = backoff.next_backoff();
                    warn!(
                        "{} {} failed ({}), retrying in {:?} (attempt {}/{})",
                        method, path, e, delay, attempt, self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_for_status(path, status, body));
        }

        let value = parse_body(&body)?;
        if method == Method::POST || method == Method::PUT {
            return check_return_code(value);
        }
        Ok(value)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, Device42Error> {
        self.request(Method::GET, path, query, None).await
    }

    /// Make a form-encoded POST request
    pub async fn post(&self, path: &str, form: &[(String, String)]) -> Result<Value, Device42Error> {
        self.request(Method::POST, path, &[], Some(form)).await
    }

    /// Make a form-encoded PUT request
    pub async fn put(&self, path: &str, form: &[(String, String)]) -> Result<Value, Device42Error> {
        self.request(Method::PUT, path, &[], Some(form)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Value, Device42Error> {
        self.request(Method::DELETE, path, &[], None).await
    }
}

/// Build query string from key/value pairs
pub fn build_query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Map a non-success response onto the error taxonomy
///
/// Device42 reports license problems as 500s whose JSON `msg` names the
/// problem. The backend does not always talk JSON on 500s, in which case the
/// generic status error is returned.
pub fn error_for_status(path: &str, status: StatusCode, body: String) -> Device42Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Device42Error::Authentication(format!("{} {} - {}", path, status, body))
        }
        StatusCode::NOT_FOUND => {
            Device42Error::NotFound(format!("Resource not found: {} - {}", path, body))
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            let msg = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
                v.get("msg").and_then(Value::as_str).map(str::to_string)
            });
            match msg {
                Some(msg) if msg.starts_with("License expired") => Device42Error::LicenseExpired(msg),
                Some(msg) if msg.starts_with("License is not valid for") => {
                    Device42Error::LicenseInsufficient(msg)
                }
                _ => Device42Error::Status { status, body },
            }
        }
        _ => Device42Error::Status { status, body },
    }
}

/// Unwrap a POST/PUT `{code, msg}` envelope
pub fn check_return_code(value: Value) -> Result<Value, Device42Error> {
    let envelope: ApiResponse = serde_json::from_value(value.clone()).map_err(|e| {
        Device42Error::UnexpectedResponse(format!("missing return code ({}): {}", e, value))
    })?;
    envelope.into_result()
}

fn parse_body(body: &str) -> Result<Value, Device42Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| {
        Device42Error::UnexpectedResponse(format!(
            "error decoding response body: {} - Response (first 500 chars): {}",
            e,
            body.chars().take(500).collect::<String>()
        ))
    })
}
