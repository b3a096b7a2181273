//! Infoblox connection settings

use crate::error::InfobloxError;
use std::env;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for an Infoblox grid master
#[derive(Clone)]
pub struct InfobloxConfig {
    /// WAPI base URL including the version, e.g. `https://infoblox.example.com/wapi/v2.7`
    pub host: String,
    pub username: String,
    pub password: String,
    /// Grid masters are commonly reached through self-signed certificates
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl std::fmt::Debug for InfobloxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfobloxConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl InfobloxConfig {
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
        }
    }

    /// Load configuration from `INFOBLOX_*` environment variables
    ///
    /// Required: `INFOBLOX_HOST`, `INFOBLOX_USERNAME`, `INFOBLOX_PASSWORD`.
    /// Optional: `INFOBLOX_VERIFY_TLS`, `INFOBLOX_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, InfobloxError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, InfobloxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| {
                InfobloxError::Configuration(format!("{} environment variable is required", key))
            })
        };

        let mut config = Self::new(
            required("INFOBLOX_HOST")?,
            required("INFOBLOX_USERNAME")?,
            required("INFOBLOX_PASSWORD")?,
        );

        if let Some(verify) = lookup("INFOBLOX_VERIFY_TLS") {
            config.verify_tls = match verify.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(InfobloxError::Configuration(format!(
                        "INFOBLOX_VERIFY_TLS must be a boolean, got '{}'",
                        other
                    )));
                }
            };
        }
        if let Some(secs) = lookup("INFOBLOX_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                InfobloxError::Configuration(format!(
                    "INFOBLOX_TIMEOUT_SECS must be a number, got '{}': {}",
                    secs, e
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = InfobloxConfig::from_lookup(lookup(&[
            ("INFOBLOX_HOST", "https://ib.example.com/wapi/v2.7/"),
            ("INFOBLOX_USERNAME", "reader"),
            ("INFOBLOX_PASSWORD", "pw"),
        ]))
        .unwrap();

        assert_eq!(config.host, "https://ib.example.com/wapi/v2.7");
        assert!(!config.verify_tls);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!format!("{:?}", config).contains("pw"));
    }

    #[test]
    fn test_from_lookup_missing_and_invalid() {
        let err = InfobloxConfig::from_lookup(lookup(&[("INFOBLOX_HOST", "h")])).unwrap_err();
        assert!(err.to_string().contains("INFOBLOX_USERNAME"));

        let err = InfobloxConfig::from_lookup(lookup(&[
            ("INFOBLOX_HOST", "h"),
            ("INFOBLOX_USERNAME", "u"),
            ("INFOBLOX_PASSWORD", "p"),
            ("INFOBLOX_VERIFY_TLS", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, InfobloxError::Configuration(_)));
    }
}
