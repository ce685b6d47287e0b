use super::PersistedState;
use airgate_application::ports::{
    BlocklistRepository, DeviceNameRepository, DeviceStatsRepository, SettingsRepository,
};
use airgate_domain::{DeviceCounters, DomainError, MacAddress};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Mutex;

/// Volatile store for diskless runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<PersistedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PersistedState {
        self.with(|s| s.clone())
    }

    fn with<R>(&self, f: impl FnOnce(&mut PersistedState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

#[async_trait]
impl DeviceStatsRepository for MemoryStore {
    async fn load_counters(&self, mac: &MacAddress) -> Result<DeviceCounters, DomainError> {
        Ok(self.with(|s| s.counters(mac)))
    }

    async fn save_counters(
        &self,
        mac: &MacAddress,
        counters: DeviceCounters,
    ) -> Result<(), DomainError> {
        self.with(|s| s.set_counters(mac, counters));
        Ok(())
    }

    async fn save_all_counters(
        &self,
        entries: &[(MacAddress, DeviceCounters)],
    ) -> Result<(), DomainError> {
        self.with(|s| {
            for (mac, counters) in entries {
                s.set_counters(mac, *counters);
            }
        });
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), DomainError> {
        self.with(|s| s.devices.clear());
        Ok(())
    }
}

#[async_trait]
impl BlocklistRepository for MemoryStore {
    async fn load_domains(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.with(|s| s.blocklist.entries()))
    }

    async fn save_domains(&self, domains: &[String]) -> Result<(), DomainError> {
        self.with(|s| s.blocklist.replace(domains));
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn load_upstream(&self) -> Result<Option<SocketAddr>, DomainError> {
        Ok(self.with(|s| s.upstream))
    }

    async fn save_upstream(&self, upstream: SocketAddr) -> Result<(), DomainError> {
        self.with(|s| s.upstream = Some(upstream));
        Ok(())
    }
}

#[async_trait]
impl DeviceNameRepository for MemoryStore {
    async fn load_name(&self, mac: &MacAddress) -> Result<Option<String>, DomainError> {
        Ok(self.with(|s| s.names.get(&mac.storage_key()).cloned()))
    }

    async fn save_name(&self, mac: &MacAddress, name: &str) -> Result<(), DomainError> {
        self.with(|s| s.names.insert(mac.storage_key(), name.to_string()));
        Ok(())
    }

    async fn remove_name(&self, mac: &MacAddress) -> Result<(), DomainError> {
        self.with(|s| s.names.remove(&mac.storage_key()));
        Ok(())
    }
}
