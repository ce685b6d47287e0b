use airgate_domain::{parse_upstream, DomainError};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ports::SettingsRepository;
use crate::state::SharedState;

pub struct SetUpstreamUseCase {
    state: SharedState,
    repository: Arc<dyn SettingsRepository>,
}

impl SetUpstreamUseCase {
    pub fn new(state: SharedState, repository: Arc<dyn SettingsRepository>) -> Self {
        Self { state, repository }
    }

    /// Switches the upstream resolver. Queries already queued for forwarding
    /// keep the address they were enqueued with.
    #[instrument(skip(self))]
    pub async fn execute(&self, upstream: &str) -> Result<SocketAddr, DomainError> {
        let addr = parse_upstream(upstream)?;
        let previous = self.state.write(|s| std::mem::replace(&mut s.upstream, addr));

        if let Err(e) = self.repository.save_upstream(addr).await {
            warn!(error = %e, "Failed to persist upstream resolver");
        }
        info!(%previous, upstream = %addr, "Upstream resolver changed");
        Ok(addr)
    }
}
