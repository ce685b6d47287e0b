use airgate_domain::{normalize_domain, DomainError};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ports::BlocklistRepository;
use crate::state::SharedState;

pub struct AddBlockedDomainUseCase {
    state: SharedState,
    repository: Arc<dyn BlocklistRepository>,
}

impl AddBlockedDomainUseCase {
    pub fn new(state: SharedState, repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { state, repository }
    }

    /// Adds `domain` to the block list and persists the list. Returns
    /// `Ok(false)` when the domain was already blocked.
    #[instrument(skip(self))]
    pub async fn execute(&self, domain: &str) -> Result<bool, DomainError> {
        let snapshot = self.state.write(|s| {
            let added = s.blocklist.add(domain)?;
            Ok::<_, DomainError>(added.then(|| s.blocklist.domains().to_vec()))
        })?;

        let Some(domains) = snapshot else {
            return Ok(false);
        };

        if let Err(e) = self.repository.save_domains(&domains).await {
            warn!(error = %e, "Failed to persist block list");
        }
        info!(domain = %normalize_domain(domain), total = domains.len(), "Domain blocked");
        Ok(true)
    }
}
