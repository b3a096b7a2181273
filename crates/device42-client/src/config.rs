//! Client configuration
//!
//! Credentials are expected to come from the environment (usually loaded by a
//! directory-scoped tool such as direnv), so [`Device42Config::from_env`] is the
//! common entry point. Every field can also be set programmatically.

use crate::error::Device42Error;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of items requested per page
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Default number of retries after a dropped connection
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Connection settings for a Device42 instance
#[derive(Clone)]
pub struct Device42Config {
    /// Base URL, e.g. `https://device42.example.com`
    pub host: String,
    /// Basic auth username
    pub username: String,
    /// Basic auth password
    pub password: String,
    /// Verify the server certificate. Device42 appliances usually ship with
    /// self-signed certificates, hence the default of `false`.
    pub verify_tls: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after a connection reset
    pub max_retries: u32,
    /// `limit` sent with paginated requests
    pub page_limit: u32,
}

impl std::fmt::Debug for Device42Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device42Config")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}

impl Device42Config {
    /// Create a configuration with default TLS, timeout, retry and paging settings
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            verify_tls: false,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Load configuration from `D42_*` environment variables
    ///
    /// Required: `D42_HOST`, `D42_USERNAME`, `D42_PASSWORD`.
    /// Optional: `D42_VERIFY_TLS`, `D42_TIMEOUT_SECS`, `D42_MAX_RETRIES`, `D42_PAGE_LIMIT`.
    pub fn from_env() -> Result<Self, Device42Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Used by [`Device42Config::from_env`]; handy when variables come from
    /// somewhere other than the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Device42Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    Device42Error::Configuration(format!("{} environment variable is required", key))
                })
        };

        let mut config = Self::new(
            required("D42_HOST")?,
            required("D42_USERNAME")?,
            required("D42_PASSWORD")?,
        );

        if let Some(verify) = lookup("D42_VERIFY_TLS") {
            config.verify_tls = parse_bool("D42_VERIFY_TLS", &verify)?;
        }
        if let Some(secs) = lookup("D42_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("D42_TIMEOUT_SECS", &secs)?);
        }
        if let Some(retries) = lookup("D42_MAX_RETRIES") {
            config.max_retries = parse_number("D42_MAX_RETRIES", &retries)?;
        }
        if let Some(limit) = lookup("D42_PAGE_LIMIT") {
            config.page_limit = parse_number("D42_PAGE_LIMIT", &limit)?;
            if config.page_limit == 0 {
                return Err(Device42Error::Configuration(
                    "D42_PAGE_LIMIT must be greater than zero".to_string(),
                ));
            }
        }

        Ok(config)
    }

    /// Toggle certificate verification
    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry count for dropped connections
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the page size used for paginated requests
    #[must_use]
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Device42Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Device42Error::Configuration(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, Device42Error> {
    value.trim().parse().map_err(|_| {
        Device42Error::Configuration(format!("{} must be a non-negative integer, got '{}'", key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Device42Config::from_lookup(lookup(&[
            ("D42_HOST", "https://d42.example.com/"),
            ("D42_USERNAME", "admin"),
            ("D42_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "https://d42.example.com");
        assert!(!config.verify_tls);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.page_limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Device42Config::from_lookup(lookup(&[
            ("D42_HOST", "https://d42.example.com"),
            ("D42_USERNAME", "admin"),
            ("D42_PASSWORD", "secret"),
            ("D42_VERIFY_TLS", "yes"),
            ("D42_TIMEOUT_SECS", "5"),
            ("D42_MAX_RETRIES", "3"),
            ("D42_PAGE_LIMIT", "200"),
        ]))
        .unwrap();

        assert!(config.verify_tls);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.page_limit, 200);
    }

    #[test]
    fn test_from_lookup_missing_password() {
        let err = Device42Config::from_lookup(lookup(&[
            ("D42_HOST", "https://d42.example.com"),
            ("D42_USERNAME", "admin"),
        ]))
        .unwrap_err();

        assert!(matches!(err, Device42Error::Configuration(msg) if msg.contains("D42_PASSWORD")));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let base = [
            ("D42_HOST", "https://d42.example.com"),
            ("D42_USERNAME", "admin"),
            ("D42_PASSWORD", "secret"),
        ];

        let mut vars = base.to_vec();
        vars.push(("D42_VERIFY_TLS", "maybe"));
        assert!(Device42Config::from_lookup(lookup(&vars)).is_err());

        let mut vars = base.to_vec();
        vars.push(("D42_PAGE_LIMIT", "0"));
        assert!(Device42Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Device42Config::new("https://d42", "admin", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
    }
}
