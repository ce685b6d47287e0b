use airgate_domain::MacAddress;
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;

use crate::ports::DeviceDirectory;
use crate::services::TrafficAccountant;

/// One row of the device listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceView {
    pub mac: MacAddress,
    pub name: String,
    pub ip: Option<IpAddr>,
    pub upload_bytes: u64,
    pub download_bytes: u64,
    pub total_bytes: u64,
    pub active: bool,
    pub last_seen_ms: u64,
}

pub struct GetDevicesUseCase {
    accountant: Arc<TrafficAccountant>,
    directory: Arc<dyn DeviceDirectory>,
}

impl GetDevicesUseCase {
    pub fn new(accountant: Arc<TrafficAccountant>, directory: Arc<dyn DeviceDirectory>) -> Self {
        Self {
            accountant,
            directory,
        }
    }

    /// Tracked devices ordered by total bytes, each joined with its display
    /// identity. Directory lookups run after the device snapshot is taken.
    pub async fn execute(&self) -> Vec<DeviceView> {
        let devices = self.accountant.list_all();
        let mut views = Vec::with_capacity(devices.len());

        for device in devices {
            let identity = self.directory.identify(&device.mac).await;
            views.push(DeviceView {
                mac: device.mac,
                name: identity.name,
                ip: identity.ip,
                upload_bytes: device.upload_bytes(),
                download_bytes: device.download_bytes(),
                total_bytes: device.total_bytes(),
                active: device.active,
                last_seen_ms: device.last_seen_ms,
            });
        }

        views
    }
}
