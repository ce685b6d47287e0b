use crate::mac_address::MacAddress;
use crate::tracked_device::{DeviceCounters, TrackedDevice};
use crate::traffic::Direction;

/// What `admission` would do for an address not yet in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Tracked,
    FreeSlot,
    Evict(MacAddress),
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Updated,
    Created,
    /// Created by replacing the stalest inactive device, returned here so the
    /// caller can persist it.
    CreatedByEviction(TrackedDevice),
    Rejected,
}

/// Bounded per-station table.
///
/// Slots keep their position for the lifetime of the entry; an eviction
/// reuses the slot of the evicted device so listing order stays stable.
#[derive(Debug, Clone)]
pub struct DeviceTable {
    slots: Vec<TrackedDevice>,
    capacity: usize,
}

impl DeviceTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, mac: &MacAddress) -> Option<&TrackedDevice> {
        self.slots.iter().find(|d| d.mac == *mac)
    }

    pub fn contains(&self, mac: &MacAddress) -> bool {
        self.get(mac).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedDevice> {
        self.slots.iter()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|d| d.active).count()
    }

    pub fn admission(&self, mac: &MacAddress) -> Admission {
        if self.contains(mac) {
            Admission::Tracked
        } else if self.slots.len() < self.capacity {
            Admission::FreeSlot
        } else {
            match self.eviction_candidate() {
                Some(index) => Admission::Evict(self.slots[index].mac),
                None => Admission::Full,
            }
        }
    }

    /// Adds `length` bytes for `mac`, creating the entry if needed.
    ///
    /// `seed` initializes the counters of a newly created entry and is
    /// ignored when the address is already tracked.
    pub fn record(
        &mut self,
        mac: MacAddress,
        direction: Direction,
        length: u64,
        now_ms: u64,
        seed: DeviceCounters,
    ) -> RecordOutcome {
        if let Some(device) = self.slots.iter_mut().find(|d| d.mac == mac) {
            device.account(direction, length, now_ms);
            return RecordOutcome::Updated;
        }

        let mut device = TrackedDevice::new(mac, seed, now_ms);
        device.account(direction, length, now_ms);

        if self.slots.len() < self.capacity {
            self.slots.push(device);
            return RecordOutcome::Created;
        }

        match self.eviction_candidate() {
            Some(index) => {
                let evicted = std::mem::replace(&mut self.slots[index], device);
                RecordOutcome::CreatedByEviction(evicted)
            }
            None => RecordOutcome::Rejected,
        }
    }

    /// Marks devices idle for longer than `timeout_ms` inactive. Returns how
    /// many were flipped.
    pub fn sweep(&mut self, now_ms: u64, timeout_ms: u64) -> usize {
        let mut flipped = 0;
        for device in self.slots.iter_mut().filter(|d| d.active) {
            if device.idle_for(now_ms) > timeout_ms {
                device.active = false;
                flipped += 1;
            }
        }
        flipped
    }

    /// Snapshot sorted by total bytes, largest first; equal totals keep slot order.
    pub fn sorted_by_total(&self) -> Vec<TrackedDevice> {
        let mut devices = self.slots.clone();
        devices.sort_by(|a, b| b.total_bytes().cmp(&a.total_bytes()));
        devices
    }

    pub fn reset(&mut self, mac: &MacAddress) -> bool {
        match self.slots.iter_mut().find(|d| d.mac == *mac) {
            Some(device) => {
                device.reset();
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&mut self) {
        self.slots.iter_mut().for_each(TrackedDevice::reset);
    }

    pub fn counters(&self) -> Vec<(MacAddress, DeviceCounters)> {
        self.slots.iter().map(|d| (d.mac, d.counters)).collect()
    }

    fn eviction_candidate(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.active)
            .min_by_key(|(_, d)| d.last_seen_ms)
            .map(|(index, _)| index)
    }
}
