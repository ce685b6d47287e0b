use airgate_domain::MacAddress;
use async_trait::async_trait;
use serde::Serialize;
use std::net::IpAddr;

pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    pub name: String,
    pub ip: Option<IpAddr>,
}

impl DeviceIdentity {
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_DEVICE_NAME.to_string(),
            ip: None,
        }
    }
}

/// Read-only address to display-name/IP resolution for status reporting.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn identify(&self, mac: &MacAddress) -> DeviceIdentity;
}
