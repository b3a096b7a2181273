//! Connection settings for both ends of the sync
//!
//! Settings come from a TOML file:
//!
//! ```toml
//! [infoblox]
//! host = "https://infoblox.example.com/wapi/v2.7"
//! username = "reader"
//! password = "..."
//!
//! [d42]
//! host = "https://device42.example.com"
//! username = "admin"
//! password = "..."
//! verify_tls = false
//! timeout_secs = 60
//! ```
//!
//! A missing file or section falls back to the `INFOBLOX_*` / `D42_*`
//! environment variables.

use crate::error::SyncError;
use device42_client::Device42Config;
use infoblox_client::InfobloxConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "infoblox_setup.toml";

/// One `[section]` of the configuration file
#[derive(Clone, Deserialize)]
pub struct EndpointSection {
    pub host: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub verify_tls: Option<bool>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for EndpointSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointSection")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Parsed configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub infoblox: Option<EndpointSection>,
    #[serde(default)]
    pub d42: Option<EndpointSection>,
}

impl SyncConfig {
    /// Load `path`, or an empty configuration when the file does not exist
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        if !path.exists() {
            debug!("{} not found, using environment variables", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
        Self::parse(&content)
            .map_err(|e| SyncError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Infoblox settings from the `[infoblox]` section or the environment
    pub fn infoblox(&self) -> Result<InfobloxConfig, SyncError> {
        let Some(section) = &self.infoblox else {
            return Ok(InfobloxConfig::from_env()?);
        };

        let mut config = InfobloxConfig::new(&section.host, &section.username, &section.password);
        if let Some(verify) = section.verify_tls {
            config = config.with_verify_tls(verify);
        }
        if let Some(secs) = section.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Device42 settings from the `[d42]` section or the environment
    pub fn device42(&self) -> Result<Device42Config, SyncError> {
        let Some(section) = &self.d42 else {
            return Ok(Device42Config::from_env()?);
        };

        let mut config = Device42Config::new(&section.host, &section.username, &section.password);
        if let Some(verify) = section.verify_tls {
            config = config.with_verify_tls(verify);
        }
        if let Some(secs) = section.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_sections() {
        let config = SyncConfig::parse(
            r#"
            [infoblox]
            host = "https://ib.example.com/wapi/v2.7/"
            username = "reader"
            password = "pw1"

            [d42]
            host = "https://d42.example.com"
            username = "admin"
            password = "pw2"
            verify_tls = true
            timeout_secs = 5
            "#,
        )
        .unwrap();

        let infoblox = config.infoblox().unwrap();
        assert_eq!(infoblox.host, "https://ib.example.com/wapi/v2.7");
        assert!(!infoblox.verify_tls);

        let d42 = config.device42().unwrap();
        assert_eq!(d42.username, "admin");
        assert!(d42.verify_tls);
        assert_eq!(d42.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_field_is_an_error() {
        assert!(SyncConfig::parse("[d42]\nhost = \"h\"\n").is_err());
    }

    #[test]
    fn test_load_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[d42\n").unwrap();

        let err = SyncConfig::load(&path).unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(config.infoblox.is_none());
        assert!(config.d42.is_none());
    }

    #[test]
    fn test_debug_hides_passwords() {
        let config = SyncConfig::parse(
            "[d42]\nhost = \"h\"\nusername = \"u\"\npassword = \"hunter2\"\n",
        )
        .unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
