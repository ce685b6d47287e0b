use airgate_domain::DomainError;
use async_trait::async_trait;

/// Ordered block list storage. An absent list loads as empty.
#[async_trait]
pub trait BlocklistRepository: Send + Sync {
    async fn load_domains(&self) -> Result<Vec<String>, DomainError>;
    async fn save_domains(&self, domains: &[String]) -> Result<(), DomainError>;
}
