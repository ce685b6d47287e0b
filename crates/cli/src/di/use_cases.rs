use super::Stores;
use airgate_application::ports::DeviceDirectory;
use airgate_application::use_cases::{
    AddBlockedDomainUseCase, ClearBlockedDomainsUseCase, GetBlockedDomainsUseCase,
    GetDevicesUseCase, GetStatusUseCase, RemoveBlockedDomainUseCase, RenameDeviceUseCase,
    ResetDeviceStatsUseCase, RestoreRouterStateUseCase, SetUpstreamUseCase,
};
use airgate_application::{DnsStats, SharedState, TrafficAccountant};
use std::sync::Arc;

pub struct UseCases {
    pub restore_state: Arc<RestoreRouterStateUseCase>,
    pub get_status: Arc<GetStatusUseCase>,
    pub set_upstream: Arc<SetUpstreamUseCase>,
    pub get_devices: Arc<GetDevicesUseCase>,
    pub reset_device_stats: Arc<ResetDeviceStatsUseCase>,
    pub rename_device: Arc<RenameDeviceUseCase>,
    pub add_blocked_domain: Arc<AddBlockedDomainUseCase>,
    pub remove_blocked_domain: Arc<RemoveBlockedDomainUseCase>,
    pub get_blocked_domains: Arc<GetBlockedDomainsUseCase>,
    pub clear_blocked_domains: Arc<ClearBlockedDomainsUseCase>,
}

impl UseCases {
    pub fn new(
        state: &SharedState,
        stats: &DnsStats,
        accountant: &Arc<TrafficAccountant>,
        directory: Arc<dyn DeviceDirectory>,
        stores: &Stores,
    ) -> Self {
        Self {
            restore_state: Arc::new(RestoreRouterStateUseCase::new(
                state.clone(),
                stores.blocklist.clone(),
                stores.settings.clone(),
            )),
            get_status: Arc::new(GetStatusUseCase::new(state.clone(), stats.clone())),
            set_upstream: Arc::new(SetUpstreamUseCase::new(
                state.clone(),
                stores.settings.clone(),
            )),
            get_devices: Arc::new(GetDevicesUseCase::new(accountant.clone(), directory)),
            reset_device_stats: Arc::new(ResetDeviceStatsUseCase::new(accountant.clone())),
            rename_device: Arc::new(RenameDeviceUseCase::new(stores.device_names.clone())),
            add_blocked_domain: Arc::new(AddBlockedDomainUseCase::new(
                state.clone(),
                stores.blocklist.clone(),
            )),
            remove_blocked_domain: Arc::new(RemoveBlockedDomainUseCase::new(
                state.clone(),
                stores.blocklist.clone(),
            )),
            get_blocked_domains: Arc::new(GetBlockedDomainsUseCase::new(state.clone())),
            clear_blocked_domains: Arc::new(ClearBlockedDomainsUseCase::new(
                state.clone(),
                stores.blocklist.clone(),
            )),
        }
    }
}
