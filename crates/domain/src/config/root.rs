use serde::{Deserialize, Serialize};

use super::blocking::BlockingConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::storage::StorageConfig;
use super::tracking::TrackingConfig;
use crate::mac_address::MacAddress;
use crate::upstream::parse_upstream;

/// Main configuration structure for Airgate
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// DNS listener (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Interception, cache and upstream forwarding
    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub blocking: BlockingConfig,

    /// Traffic accounting and capture
    #[serde(default)]
    pub tracking: TrackingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. airgate.toml in current directory
    /// 3. /etc/airgate/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("airgate.toml").exists() {
            Self::from_file("airgate.toml")?
        } else if std::path::Path::new("/etc/airgate/config.toml").exists() {
            Self::from_file("/etc/airgate/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(upstream) = overrides.upstream {
            self.dns.upstream = upstream;
        }
        if let Some(path) = overrides.storage_path {
            self.storage.path = path;
        }
        if let Some(interface) = overrides.capture_interface {
            self.tracking.capture_interface = Some(interface);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        parse_upstream(&self.dns.upstream)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.dns.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "dns.query_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.dns.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "dns.cache_capacity must be greater than 0".to_string(),
            ));
        }
        if self.dns.forward_queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "dns.forward_queue_capacity must be greater than 0".to_string(),
            ));
        }
        if self.blocking.max_domains == 0 {
            return Err(ConfigError::Validation(
                "blocking.max_domains must be greater than 0".to_string(),
            ));
        }
        if self.tracking.max_devices == 0 {
            return Err(ConfigError::Validation(
                "tracking.max_devices must be greater than 0".to_string(),
            ));
        }
        if self.tracking.event_channel_capacity < 2 {
            return Err(ConfigError::Validation(
                "tracking.event_channel_capacity must be at least 2".to_string(),
            ));
        }
        if self.tracking.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tracking.tick_interval_ms must be greater than 0".to_string(),
            ));
        }

        for mac in &self.tracking.self_macs {
            mac.parse::<MacAddress>()
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }

        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream: Option<String>,
    pub storage_path: Option<String>,
    pub capture_interface: Option<String>,
    pub log_level: Option<String>,
}
