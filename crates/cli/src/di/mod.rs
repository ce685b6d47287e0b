mod repositories;
mod use_cases;

pub use repositories::Stores;
pub use use_cases::UseCases;

use airgate_application::{DnsStats, RouterState, SharedState, TrafficAccountant};
use airgate_domain::{parse_upstream, BlockList, Config, DeviceTable, MacAddress};
use airgate_infrastructure::system::{LinuxArpReader, MonotonicClock, StoredNameDirectory};
use std::sync::Arc;

/// Shared router state with the services and use cases wired over it.
pub struct AppContext {
    pub state: SharedState,
    pub stats: DnsStats,
    pub clock: Arc<MonotonicClock>,
    pub accountant: Arc<TrafficAccountant>,
    pub use_cases: UseCases,
}

impl AppContext {
    /// Builds the context and loads the persisted block list and upstream.
    pub async fn build(
        config: &Config,
        stores: &Stores,
        self_macs: Vec<MacAddress>,
    ) -> anyhow::Result<Self> {
        let upstream = parse_upstream(&config.dns.upstream)?;
        let state = SharedState::new(RouterState::new(
            DeviceTable::new(config.tracking.max_devices),
            BlockList::new(config.blocking.max_domains),
            upstream,
        ));
        let stats = DnsStats::new();
        let clock = Arc::new(MonotonicClock::new());

        let accountant = Arc::new(
            TrafficAccountant::new(state.clone(), stores.device_stats.clone(), clock.clone())
                .with_self_macs(self_macs)
                .with_intervals(
                    config.tracking.device_timeout(),
                    config.tracking.save_interval(),
                ),
        );

        let directory = Arc::new(StoredNameDirectory::new(
            stores.device_names.clone(),
            Arc::new(LinuxArpReader::new()),
        ));
        let use_cases = UseCases::new(&state, &stats, &accountant, directory, stores);

        use_cases
            .restore_state
            .execute(&config.blocking.custom_blocked)
            .await;

        Ok(Self {
            state,
            stats,
            clock,
            accountant,
            use_cases,
        })
    }
}
