use airgate_domain::{
    Admission, DeviceCounters, MacAddress, RecordOutcome, TrackedDevice, TrafficEvent,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::ports::{Clock, DeviceStatsRepository};
use crate::state::SharedState;

/// Per-station byte accounting fed by the capture event channel.
///
/// Owns no collection itself: the device table lives in [`SharedState`] and
/// every access takes the lock for a single read or write. Persistence runs
/// after the lock is released.
pub struct TrafficAccountant {
    state: SharedState,
    stats_repo: Arc<dyn DeviceStatsRepository>,
    clock: Arc<dyn Clock>,
    self_macs: Vec<MacAddress>,
    device_timeout_ms: u64,
    save_interval_ms: u64,
    last_save_ms: AtomicU64,
}

impl TrafficAccountant {
    pub fn new(
        state: SharedState,
        stats_repo: Arc<dyn DeviceStatsRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let now = clock.now_millis();
        Self {
            state,
            stats_repo,
            clock,
            self_macs: Vec::new(),
            device_timeout_ms: 3_600_000,
            save_interval_ms: 300_000,
            last_save_ms: AtomicU64::new(now),
        }
    }

    /// Addresses of the appliance itself; frames accounted against them are ignored.
    pub fn with_self_macs(mut self, self_macs: Vec<MacAddress>) -> Self {
        self.self_macs = self_macs;
        self
    }

    pub fn with_intervals(mut self, device_timeout: Duration, save_interval: Duration) -> Self {
        self.device_timeout_ms = device_timeout.as_millis() as u64;
        self.save_interval_ms = save_interval.as_millis() as u64;
        self
    }

    /// Accounts one classified frame.
    ///
    /// Returns `None` for frames that are filtered out (group addresses or
    /// self traffic) and `Some(RecordOutcome::Rejected)` when the table is
    /// full of active devices.
    pub async fn record_event(&self, event: TrafficEvent) -> Option<RecordOutcome> {
        if event.involves_group_address() {
            return None;
        }
        let client = event.client();
        if self.self_macs.contains(&client) {
            return None;
        }

        let seed = match self.state.read(|s| s.devices.admission(&client)) {
            Admission::Tracked => DeviceCounters::default(),
            Admission::Full => {
                debug!(mac = %client, "Device table full, frame not tracked");
                return Some(RecordOutcome::Rejected);
            }
            Admission::FreeSlot | Admission::Evict(_) => self.load_persisted(&client).await,
        };

        let now = self.clock.now_millis();
        let outcome = self.state.write(|s| {
            s.devices
                .record(client, event.direction, event.length as u64, now, seed)
        });

        match &outcome {
            RecordOutcome::Created => {
                info!(mac = %client, "New device tracked");
            }
            RecordOutcome::CreatedByEviction(evicted) => {
                info!(mac = %client, evicted = %evicted.mac, "New device tracked, evicted inactive device");
                self.persist(&evicted.mac, evicted.counters).await;
            }
            RecordOutcome::Rejected => {
                debug!(mac = %client, "Device table full, frame not tracked");
            }
            RecordOutcome::Updated => {}
        }

        Some(outcome)
    }

    /// Flips devices idle past the activity timeout to inactive.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let timeout = self.device_timeout_ms;
        let flipped = self.state.write(|s| s.devices.sweep(now, timeout));
        if flipped > 0 {
            debug!(flipped, "Devices marked inactive");
        }
        flipped
    }

    /// All tracked devices, largest total first.
    pub fn list_all(&self) -> Vec<TrackedDevice> {
        self.state.read(|s| s.devices.sorted_by_total())
    }

    pub fn device(&self, mac: &MacAddress) -> Option<TrackedDevice> {
        self.state.read(|s| s.devices.get(mac).cloned())
    }

    pub fn tracked_count(&self) -> usize {
        self.state.read(|s| s.devices.len())
    }

    pub fn active_count(&self) -> usize {
        self.state.read(|s| s.devices.active_count())
    }

    /// Zeroes one device and persists the zeroed counters. Returns `false`
    /// when the address is not tracked.
    #[instrument(skip(self))]
    pub async fn reset(&self, mac: &MacAddress) -> bool {
        let found = self.state.write(|s| s.devices.reset(mac));
        if found {
            self.persist(mac, DeviceCounters::default()).await;
            info!(mac = %mac, "Device counters reset");
        }
        found
    }

    #[instrument(skip(self))]
    pub async fn reset_all(&self) {
        self.state.write(|s| s.devices.reset_all());
        if let Err(e) = self.stats_repo.clear_all().await {
            warn!(error = %e, "Failed to clear persisted device counters");
        }
        info!("All device counters reset");
    }

    /// Persists every tracked device's counters.
    pub async fn save(&self) -> usize {
        let snapshot = self.state.read(|s| s.devices.counters());
        if !snapshot.is_empty() {
            if let Err(e) = self.stats_repo.save_all_counters(&snapshot).await {
                warn!(devices = snapshot.len(), error = %e, "Failed to persist device counters");
            }
        }
        self.last_save_ms
            .store(self.clock.now_millis(), Ordering::Relaxed);
        debug!(devices = snapshot.len(), "Device counters saved");
        snapshot.len()
    }

    /// Runs [`save`](Self::save) once the save interval has elapsed since the
    /// previous save.
    pub async fn save_if_due(&self) -> bool {
        let now = self.clock.now_millis();
        let last = self.last_save_ms.load(Ordering::Relaxed);
        if now.saturating_sub(last) < self.save_interval_ms {
            return false;
        }
        self.save().await;
        true
    }

    async fn load_persisted(&self, mac: &MacAddress) -> DeviceCounters {
        match self.stats_repo.load_counters(mac).await {
            Ok(counters) => counters,
            Err(e) => {
                warn!(mac = %mac, error = %e, "Failed to load persisted counters");
                DeviceCounters::default()
            }
        }
    }

    async fn persist(&self, mac: &MacAddress, counters: DeviceCounters) {
        if let Err(e) = self.stats_repo.save_counters(mac, counters).await {
            warn!(mac = %mac, error = %e, "Failed to persist device counters");
        }
    }
}

impl std::fmt::Debug for TrafficAccountant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficAccountant")
            .field("self_macs", &self.self_macs)
            .field("device_timeout_ms", &self.device_timeout_ms)
            .field("save_interval_ms", &self.save_interval_ms)
            .finish()
    }
}
