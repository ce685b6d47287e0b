use airgate_domain::{DeviceCounters, DomainError, MacAddress};
use async_trait::async_trait;

/// Per-device byte counter storage. Unknown devices load as zero.
#[async_trait]
pub trait DeviceStatsRepository: Send + Sync {
    async fn load_counters(&self, mac: &MacAddress) -> Result<DeviceCounters, DomainError>;
    async fn save_counters(
        &self,
        mac: &MacAddress,
        counters: DeviceCounters,
    ) -> Result<(), DomainError>;
    /// Stores every entry in one write.
    async fn save_all_counters(
        &self,
        entries: &[(MacAddress, DeviceCounters)],
    ) -> Result<(), DomainError>;
    async fn clear_all(&self) -> Result<(), DomainError>;
}
