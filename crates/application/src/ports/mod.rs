mod arp_reader;
mod blocklist_repository;
mod clock;
mod device_directory;
mod device_name_repository;
mod device_stats_repository;
mod settings_repository;

pub use arp_reader::{ArpReader, ArpTable};
pub use blocklist_repository::BlocklistRepository;
pub use clock::Clock;
pub use device_directory::{DeviceDirectory, DeviceIdentity, UNKNOWN_DEVICE_NAME};
pub use device_name_repository::{DeviceNameRepository, MAX_DEVICE_NAME_LEN};
pub use device_stats_repository::DeviceStatsRepository;
pub use settings_repository::SettingsRepository;
