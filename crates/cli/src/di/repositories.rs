use airgate_application::ports::{
    BlocklistRepository, DeviceNameRepository, DeviceStatsRepository, SettingsRepository,
};
use std::sync::Arc;

/// The persistence ports, all served by one backend.
#[derive(Clone)]
pub struct Stores {
    pub device_stats: Arc<dyn DeviceStatsRepository>,
    pub blocklist: Arc<dyn BlocklistRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub device_names: Arc<dyn DeviceNameRepository>,
}

impl Stores {
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: DeviceStatsRepository
            + BlocklistRepository
            + SettingsRepository
            + DeviceNameRepository
            + 'static,
    {
        Self {
            device_stats: backend.clone(),
            blocklist: backend.clone(),
            settings: backend.clone(),
            device_names: backend,
        }
    }
}
