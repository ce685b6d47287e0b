use airgate_domain::DomainError;
use async_trait::async_trait;
use std::net::SocketAddr;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load_upstream(&self) -> Result<Option<SocketAddr>, DomainError>;
    async fn save_upstream(&self, upstream: SocketAddr) -> Result<(), DomainError>;
}
