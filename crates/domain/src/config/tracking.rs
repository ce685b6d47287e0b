use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Traffic accounting and capture settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackingConfig {
    #[serde(default = "default_max_devices")]
    pub max_devices: usize,

    /// Idle time after which an active device is marked inactive.
    #[serde(default = "default_device_timeout_secs")]
    pub device_timeout_secs: u64,

    #[serde(default = "default_save_interval_secs")]
    pub save_interval_secs: u64,

    /// Slot count of the capture event channel; one slot always stays empty.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Bytes subtracted from the reported signal length to approximate the
    /// payload (802.11 header, CCMP and FCS).
    #[serde(default = "default_frame_overhead")]
    pub frame_overhead: u16,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,

    /// Monitor-mode interface frames are captured from. Capture is disabled
    /// when unset.
    #[serde(default)]
    pub capture_interface: Option<String>,

    #[serde(default = "default_ap_interface")]
    pub ap_interface: Option<String>,

    #[serde(default)]
    pub station_interface: Option<String>,

    /// Extra addresses owned by the appliance, never accounted as clients.
    #[serde(default)]
    pub self_macs: Vec<String>,
}

impl TrackingConfig {
    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.device_timeout_secs)
    }

    pub fn save_interval(&self) -> Duration {
        Duration::from_secs(self.save_interval_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_devices: default_max_devices(),
            device_timeout_secs: default_device_timeout_secs(),
            save_interval_secs: default_save_interval_secs(),
            event_channel_capacity: default_event_channel_capacity(),
            frame_overhead: default_frame_overhead(),
            tick_interval_ms: default_tick_interval_ms(),
            status_interval_secs: default_status_interval_secs(),
            capture_interface: None,
            ap_interface: default_ap_interface(),
            station_interface: None,
            self_macs: vec![],
        }
    }
}

fn default_max_devices() -> usize {
    16
}

fn default_device_timeout_secs() -> u64 {
    3600
}

fn default_save_interval_secs() -> u64 {
    300
}

fn default_event_channel_capacity() -> usize {
    512
}

fn default_frame_overhead() -> u16 {
    36
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_status_interval_secs() -> u64 {
    60
}

fn default_ap_interface() -> Option<String> {
    Some("wlan0".to_string())
}
