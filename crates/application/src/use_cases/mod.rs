pub mod blocklist;
pub mod devices;
pub mod settings;

pub use blocklist::{
    AddBlockedDomainUseCase, ClearBlockedDomainsUseCase, GetBlockedDomainsUseCase,
    RemoveBlockedDomainUseCase,
};
pub use devices::{DeviceView, GetDevicesUseCase, RenameDeviceUseCase, ResetDeviceStatsUseCase};
pub use settings::{GetStatusUseCase, RestoreRouterStateUseCase, RouterStatus, SetUpstreamUseCase};
