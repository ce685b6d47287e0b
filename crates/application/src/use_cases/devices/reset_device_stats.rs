use airgate_domain::{DomainError, MacAddress};
use std::sync::Arc;

use crate::services::TrafficAccountant;

pub struct ResetDeviceStatsUseCase {
    accountant: Arc<TrafficAccountant>,
}

impl ResetDeviceStatsUseCase {
    pub fn new(accountant: Arc<TrafficAccountant>) -> Self {
        Self { accountant }
    }

    pub async fn execute(&self, mac: &MacAddress) -> Result<(), DomainError> {
        if self.accountant.reset(mac).await {
            Ok(())
        } else {
            Err(DomainError::DeviceNotFound(mac.to_string()))
        }
    }

    pub async fn execute_all(&self) {
        self.accountant.reset_all().await;
    }
}
