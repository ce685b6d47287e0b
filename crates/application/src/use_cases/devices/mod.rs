pub mod get_devices;
pub mod rename_device;
pub mod reset_device_stats;

pub use get_devices::{DeviceView, GetDevicesUseCase};
pub use rename_device::RenameDeviceUseCase;
pub use reset_device_stats::ResetDeviceStatsUseCase;
