use airgate_domain::normalize_domain;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ports::BlocklistRepository;
use crate::state::SharedState;

pub struct RemoveBlockedDomainUseCase {
    state: SharedState,
    repository: Arc<dyn BlocklistRepository>,
}

impl RemoveBlockedDomainUseCase {
    pub fn new(state: SharedState, repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { state, repository }
    }

    /// Returns `false` when the domain was not in the list.
    #[instrument(skip(self))]
    pub async fn execute(&self, domain: &str) -> bool {
        let snapshot = self.state.write(|s| {
            s.blocklist
                .remove(domain)
                .then(|| s.blocklist.domains().to_vec())
        });

        let Some(domains) = snapshot else {
            return false;
        };

        if let Err(e) = self.repository.save_domains(&domains).await {
            warn!(error = %e, "Failed to persist block list");
        }
        info!(domain = %normalize_domain(domain), total = domains.len(), "Domain unblocked");
        true
    }
}
