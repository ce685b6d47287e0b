use airgate_application::ports::{
    ArpReader, DeviceDirectory, DeviceIdentity, DeviceNameRepository, UNKNOWN_DEVICE_NAME,
};
use airgate_domain::MacAddress;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Resolves devices from user-assigned names plus the kernel ARP cache.
pub struct StoredNameDirectory {
    names: Arc<dyn DeviceNameRepository>,
    arp: Arc<dyn ArpReader>,
}

impl StoredNameDirectory {
    pub fn new(names: Arc<dyn DeviceNameRepository>, arp: Arc<dyn ArpReader>) -> Self {
        Self { names, arp }
    }
}

#[async_trait]
impl DeviceDirectory for StoredNameDirectory {
    async fn identify(&self, mac: &MacAddress) -> DeviceIdentity {
        let name = match self.names.load_name(mac).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_DEVICE_NAME.to_string(),
            Err(e) => {
                debug!(%mac, error = %e, "Name lookup failed");
                UNKNOWN_DEVICE_NAME.to_string()
            }
        };

        let ip = match self.arp.read_arp_table().await {
            Ok(table) => table.get(mac).copied(),
            Err(e) => {
                debug!(error = %e, "ARP lookup failed");
                None
            }
        };

        DeviceIdentity { name, ip }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use airgate_application::ports::ArpTable;
    use airgate_domain::DomainError;

    struct StaticArp(ArpTable);

    #[async_trait]
    impl ArpReader for StaticArp {
        async fn read_arp_table(&self) -> Result<ArpTable, DomainError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenArp;

    #[async_trait]
    impl ArpReader for BrokenArp {
        async fn read_arp_table(&self) -> Result<ArpTable, DomainError> {
            Err(DomainError::IoError("no arp".into()))
        }
    }

    const PHONE: MacAddress = MacAddress::new([0x02, 0, 0, 0, 0, 0x01]);

    #[tokio::test]
    async fn test_joins_name_and_ip() {
        let store = Arc::new(MemoryStore::new());
        store.save_name(&PHONE, "Phone").await.unwrap();
        let arp = StaticArp(ArpTable::from([(PHONE, "192.168.4.2".parse().unwrap())]));

        let identity = StoredNameDirectory::new(store, Arc::new(arp))
            .identify(&PHONE)
            .await;

        assert_eq!(identity.name, "Phone");
        assert_eq!(identity.ip, Some("192.168.4.2".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_unknown_device_falls_back() {
        let directory = StoredNameDirectory::new(Arc::new(MemoryStore::new()), Arc::new(BrokenArp));

        assert_eq!(directory.identify(&PHONE).await, DeviceIdentity::unknown());
    }
}
