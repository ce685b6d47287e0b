use crate::mac_address::MacAddress;
use crate::traffic::Direction;
use serde::{Deserialize, Serialize};

/// Cumulative byte counters for one station, as persisted between restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceCounters {
    pub upload_bytes: u64,
    pub download_bytes: u64,
}

impl DeviceCounters {
    pub fn total(&self) -> u64 {
        self.upload_bytes.saturating_add(self.download_bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedDevice {
    pub mac: MacAddress,
    pub counters: DeviceCounters,
    /// Monotonic milliseconds of the last accounted frame.
    pub last_seen_ms: u64,
    pub active: bool,
}

impl TrackedDevice {
    pub fn new(mac: MacAddress, counters: DeviceCounters, now_ms: u64) -> Self {
        Self {
            mac,
            counters,
            last_seen_ms: now_ms,
            active: true,
        }
    }

    pub fn upload_bytes(&self) -> u64 {
        self.counters.upload_bytes
    }

    pub fn download_bytes(&self) -> u64 {
        self.counters.download_bytes
    }

    pub fn total_bytes(&self) -> u64 {
        self.counters.total()
    }

    pub fn account(&mut self, direction: Direction, length: u64, now_ms: u64) {
        match direction {
            Direction::Upload => {
                self.counters.upload_bytes = self.counters.upload_bytes.saturating_add(length)
            }
            Direction::Download => {
                self.counters.download_bytes = self.counters.download_bytes.saturating_add(length)
            }
        }
        self.last_seen_ms = now_ms;
        self.active = true;
    }

    pub fn idle_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_seen_ms)
    }

    pub fn reset(&mut self) {
        self.counters = DeviceCounters::default();
    }
}
