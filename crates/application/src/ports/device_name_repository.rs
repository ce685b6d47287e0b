use airgate_domain::{DomainError, MacAddress};
use async_trait::async_trait;

/// Longest display name accepted for a device.
pub const MAX_DEVICE_NAME_LEN: usize = 31;

#[async_trait]
pub trait DeviceNameRepository: Send + Sync {
    async fn load_name(&self, mac: &MacAddress) -> Result<Option<String>, DomainError>;
    async fn save_name(&self, mac: &MacAddress, name: &str) -> Result<(), DomainError>;
    async fn remove_name(&self, mac: &MacAddress) -> Result<(), DomainError>;
}
