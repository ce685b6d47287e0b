use serde::Serialize;
use std::net::SocketAddr;

use crate::state::SharedState;
use crate::stats::{DnsStats, DnsStatsSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterStatus {
    pub upstream: SocketAddr,
    pub dns: DnsStatsSnapshot,
    pub tracked_devices: usize,
    pub active_devices: usize,
    pub device_capacity: usize,
    pub blocked_domains: usize,
}

pub struct GetStatusUseCase {
    state: SharedState,
    stats: DnsStats,
}

impl GetStatusUseCase {
    pub fn new(state: SharedState, stats: DnsStats) -> Self {
        Self { state, stats }
    }

    pub fn execute(&self) -> RouterStatus {
        let dns = self.stats.snapshot();
        self.state.read(|s| RouterStatus {
            upstream: s.upstream,
            dns,
            tracked_devices: s.devices.len(),
            active_devices: s.devices.active_count(),
            device_capacity: s.devices.capacity(),
            blocked_domains: s.blocklist.len(),
        })
    }
}
