pub mod add_blocked_domain;
pub mod clear_blocked_domains;
pub mod get_blocked_domains;
pub mod remove_blocked_domain;

pub use add_blocked_domain::AddBlockedDomainUseCase;
pub use clear_blocked_domains::ClearBlockedDomainsUseCase;
pub use get_blocked_domains::GetBlockedDomainsUseCase;
pub use remove_blocked_domain::RemoveBlockedDomainUseCase;
