use airgate_domain::{DomainError, MacAddress};
use std::path::PathBuf;
use tokio::fs;
use tracing::warn;

/// Reads interface hardware addresses from sysfs.
pub struct InterfaceAddresses {
    root: PathBuf,
}

impl InterfaceAddresses {
    pub fn new() -> Self {
        Self::with_root("/sys/class/net")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn mac_of(&self, interface: &str) -> Result<MacAddress, DomainError> {
        let path = self.root.join(interface).join("address");
        let raw = fs::read_to_string(&path).await.map_err(|e| {
            DomainError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        raw.trim().parse()
    }

    /// Addresses of every interface that could be read; failures are logged
    /// and skipped.
    pub async fn collect<'a>(&self, interfaces: impl IntoIterator<Item = &'a str>) -> Vec<MacAddress> {
        let mut macs = Vec::new();
        for interface in interfaces {
            match self.mac_of(interface).await {
                Ok(mac) => macs.push(mac),
                Err(e) => warn!(interface, error = %e, "Could not read interface address"),
            }
        }
        macs
    }
}

impl Default for InterfaceAddresses {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sysfs(entries: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, address) in entries {
            let iface = dir.path().join(name);
            std::fs::create_dir_all(&iface).unwrap();
            std::fs::write(iface.join("address"), address).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_reads_interface_address() {
        let dir = sysfs(&[("wlan0", "02:aa:bb:cc:dd:01\n")]);
        let addresses = InterfaceAddresses::with_root(dir.path());

        let mac = addresses.mac_of("wlan0").await.unwrap();

        assert_eq!(mac, MacAddress::new([0x02, 0xAA, 0xBB, 0xCC, 0xDD, 0x01]));
    }

    #[tokio::test]
    async fn test_collect_skips_missing_and_invalid() {
        let dir = sysfs(&[("wlan0", "02:aa:bb:cc:dd:01\n"), ("bogus0", "garbage\n")]);
        let addresses = InterfaceAddresses::with_root(dir.path());

        let macs = addresses.collect(["wlan0", "bogus0", "wlan1"]).await;

        assert_eq!(macs.len(), 1);
    }
}
