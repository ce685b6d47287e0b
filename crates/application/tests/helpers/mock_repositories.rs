#![allow(dead_code)]

use airgate_application::ports::{
    BlocklistRepository, Clock, DeviceDirectory, DeviceIdentity, DeviceNameRepository,
    DeviceStatsRepository, SettingsRepository,
};
use airgate_application::{RouterState, SharedState};
use airgate_domain::{BlockList, DeviceCounters, DeviceTable, DomainError, MacAddress};
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

pub fn mac(n: u8) -> MacAddress {
    MacAddress::new([0x02, 0x00, 0x00, 0x00, 0x00, n])
}

pub fn shared_state(max_devices: usize) -> SharedState {
    SharedState::new(RouterState::new(
        DeviceTable::new(max_devices),
        BlockList::new(100),
        "1.1.1.1:53".parse().unwrap(),
    ))
}

#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub struct MockDeviceStatsRepository {
    counters: Arc<RwLock<HashMap<MacAddress, DeviceCounters>>>,
    should_fail: Arc<AtomicBool>,
    save_calls: Arc<AtomicU64>,
    clear_calls: Arc<AtomicU64>,
}

impl MockDeviceStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counters(entries: Vec<(MacAddress, u64, u64)>) -> Self {
        let repo = Self::new();
        {
            let mut counters = repo.counters.write().unwrap();
            for (mac, up, down) in entries {
                counters.insert(
                    mac,
                    DeviceCounters {
                        upload_bytes: up,
                        download_bytes: down,
                    },
                );
            }
        }
        repo
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self, mac: &MacAddress) -> Option<DeviceCounters> {
        self.counters.read().unwrap().get(mac).copied()
    }

    pub fn save_calls(&self) -> u64 {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> u64 {
        self.clear_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            Err(DomainError::Persistence("mock failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DeviceStatsRepository for MockDeviceStatsRepository {
    async fn load_counters(&self, mac: &MacAddress) -> Result<DeviceCounters, DomainError> {
        self.check()?;
        Ok(self.stored(mac).unwrap_or_default())
    }

    async fn save_counters(
        &self,
        mac: &MacAddress,
        counters: DeviceCounters,
    ) -> Result<(), DomainError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.counters.write().unwrap().insert(*mac, counters);
        Ok(())
    }

    async fn save_all_counters(
        &self,
        entries: &[(MacAddress, DeviceCounters)],
    ) -> Result<(), DomainError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.counters.write().unwrap().extend(entries.iter().copied());
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), DomainError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.counters.write().unwrap().clear();
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockBlocklistRepository {
    domains: Arc<RwLock<Vec<String>>>,
    should_fail: Arc<AtomicBool>,
}

impl MockBlocklistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocked_domains(domains: Vec<&str>) -> Self {
        let repo = Self::new();
        *repo.domains.write().unwrap() = domains.into_iter().map(String::from).collect();
        repo
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Vec<String> {
        self.domains.read().unwrap().clone()
    }
}

#[async_trait]
impl BlocklistRepository for MockBlocklistRepository {
    async fn load_domains(&self) -> Result<Vec<String>, DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("mock failure".to_string()));
        }
        Ok(self.stored())
    }

    async fn save_domains(&self, domains: &[String]) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("mock failure".to_string()));
        }
        *self.domains.write().unwrap() = domains.to_vec();
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockSettingsRepository {
    upstream: Arc<RwLock<Option<SocketAddr>>>,
}

impl MockSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upstream(addr: &str) -> Self {
        let repo = Self::new();
        *repo.upstream.write().unwrap() = Some(addr.parse().unwrap());
        repo
    }

    pub fn stored(&self) -> Option<SocketAddr> {
        *self.upstream.read().unwrap()
    }
}

#[async_trait]
impl SettingsRepository for MockSettingsRepository {
    async fn load_upstream(&self) -> Result<Option<SocketAddr>, DomainError> {
        Ok(self.stored())
    }

    async fn save_upstream(&self, upstream: SocketAddr) -> Result<(), DomainError> {
        *self.upstream.write().unwrap() = Some(upstream);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockDeviceNameRepository {
    names: Arc<RwLock<HashMap<MacAddress, String>>>,
}

impl MockDeviceNameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self, mac: &MacAddress) -> Option<String> {
        self.names.read().unwrap().get(mac).cloned()
    }
}

#[async_trait]
impl DeviceNameRepository for MockDeviceNameRepository {
    async fn load_name(&self, mac: &MacAddress) -> Result<Option<String>, DomainError> {
        Ok(self.stored(mac))
    }

    async fn save_name(&self, mac: &MacAddress, name: &str) -> Result<(), DomainError> {
        self.names.write().unwrap().insert(*mac, name.to_string());
        Ok(())
    }

    async fn remove_name(&self, mac: &MacAddress) -> Result<(), DomainError> {
        self.names.write().unwrap().remove(mac);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockDeviceDirectory {
    entries: Arc<RwLock<HashMap<MacAddress, DeviceIdentity>>>,
}

impl MockDeviceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, mac: MacAddress, name: &str, ip: Option<&str>) {
        self.entries.write().unwrap().insert(
            mac,
            DeviceIdentity {
                name: name.to_string(),
                ip: ip.map(|s| s.parse::<IpAddr>().unwrap()),
            },
        );
    }
}

#[async_trait]
impl DeviceDirectory for MockDeviceDirectory {
    async fn identify(&self, mac: &MacAddress) -> DeviceIdentity {
        self.entries
            .read()
            .unwrap()
            .get(mac)
            .cloned()
            .unwrap_or_else(DeviceIdentity::unknown)
    }
}
