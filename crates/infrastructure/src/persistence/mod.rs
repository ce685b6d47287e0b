pub mod json_store;
pub mod memory_store;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;

use airgate_domain::{DeviceCounters, MacAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// Everything the appliance keeps between restarts. Absent sections load as
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Byte counters keyed by [`MacAddress::storage_key`].
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceCounters>,
    #[serde(default)]
    pub blocklist: StoredBlocklist,
    #[serde(default)]
    pub upstream: Option<SocketAddr>,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

impl PersistedState {
    pub fn counters(&self, mac: &MacAddress) -> DeviceCounters {
        self.devices
            .get(&mac.storage_key())
            .copied()
            .unwrap_or_default()
    }

    pub fn set_counters(&mut self, mac: &MacAddress, counters: DeviceCounters) {
        self.devices.insert(mac.storage_key(), counters);
    }
}

/// Count-prefixed ordered domain list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlocklist {
    pub count: usize,
    pub domains: Vec<String>,
}

impl StoredBlocklist {
    /// The first `count` domains; a shorter list yields what is present.
    pub fn entries(&self) -> Vec<String> {
        self.domains.iter().take(self.count).cloned().collect()
    }

    pub fn replace(&mut self, domains: &[String]) {
        self.count = domains.len();
        self.domains = domains.to_vec();
    }
}
