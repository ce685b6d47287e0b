use airgate_domain::{DomainError, MacAddress};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::{DeviceNameRepository, MAX_DEVICE_NAME_LEN};

pub struct RenameDeviceUseCase {
    names: Arc<dyn DeviceNameRepository>,
}

impl RenameDeviceUseCase {
    pub fn new(names: Arc<dyn DeviceNameRepository>) -> Self {
        Self { names }
    }

    /// Stores a display name for `mac`; a blank name clears it.
    #[instrument(skip(self))]
    pub async fn execute(&self, mac: &MacAddress, name: &str) -> Result<(), DomainError> {
        let name = name.trim();

        if name.is_empty() {
            self.names.remove_name(mac).await?;
            info!(mac = %mac, "Device name cleared");
            return Ok(());
        }

        if name.chars().count() > MAX_DEVICE_NAME_LEN || name.chars().any(char::is_control) {
            return Err(DomainError::InvalidDeviceName(name.to_string()));
        }

        self.names.save_name(mac, name).await?;
        info!(mac = %mac, name, "Device renamed");
        Ok(())
    }
}
