use airgate_application::ports::{ArpReader, ArpTable};
use airgate_domain::{DomainError, MacAddress};
use async_trait::async_trait;
use std::net::IpAddr;
use tokio::fs;
use tracing::{debug, warn};

const ATF_COMPLETE: &str = "0x2";

/// Linux neighbour cache reader (`/proc/net/arp`), keyed by hardware address.
pub struct LinuxArpReader {
    arp_path: String,
}

impl LinuxArpReader {
    pub fn new() -> Self {
        Self::with_path("/proc/net/arp")
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            arp_path: path.into(),
        }
    }
}

impl Default for LinuxArpReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArpReader for LinuxArpReader {
    async fn read_arp_table(&self) -> Result<ArpTable, DomainError> {
        let content = fs::read_to_string(&self.arp_path)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to read ARP cache: {}", e)))?;

        let mut table = ArpTable::new();

        // IP address       HW type     Flags       HW address            Mask     Device
        // 192.168.4.2      0x1         0x2         aa:bb:cc:dd:ee:ff     *        wlan0
        for line in content.lines().skip(1) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 || fields[2] != ATF_COMPLETE {
                continue;
            }

            let ip = match fields[0].parse::<IpAddr>() {
                Ok(ip) => ip,
                Err(e) => {
                    warn!(error = %e, ip = fields[0], "Invalid IP in ARP table");
                    continue;
                }
            };
            let Ok(mac) = fields[3].parse::<MacAddress>() else {
                continue;
            };
            if mac.octets() == [0; 6] {
                continue;
            }

            table.insert(mac, ip);
        }

        debug!(entries = table.len(), "ARP table parsed");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn arp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_parse_arp_table() {
        let file = arp_file(
            r#"IP address       HW type     Flags       HW address            Mask     Device
192.168.4.2      0x1         0x2         aa:bb:cc:dd:ee:ff     *        wlan0
192.168.4.3      0x1         0x2         11:22:33:44:55:66     *        wlan0
192.168.4.4      0x1         0x0         00:00:00:00:00:00     *        wlan0
invalid.ip       0x1         0x2         22:22:22:22:22:22     *        wlan0
"#,
        );

        let table = LinuxArpReader::with_path(file.path().to_string_lossy())
            .read_arp_table()
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(&"AA:BB:CC:DD:EE:FF".parse().unwrap()),
            Some(&"192.168.4.2".parse().unwrap())
        );
        assert_eq!(
            table.get(&"11:22:33:44:55:66".parse().unwrap()),
            Some(&"192.168.4.3".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn test_header_only() {
        let file = arp_file("IP address       HW type     Flags       HW address            Mask     Device\n");
        let table = LinuxArpReader::with_path(file.path().to_string_lossy())
            .read_arp_table()
            .await
            .unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = LinuxArpReader::with_path("/nonexistent/arp")
            .read_arp_table()
            .await;
        assert!(result.is_err());
    }
}
