use std::sync::Arc;
use tracing::{info, warn};

use crate::ports::BlocklistRepository;
use crate::state::SharedState;

pub struct ClearBlockedDomainsUseCase {
    state: SharedState,
    repository: Arc<dyn BlocklistRepository>,
}

impl ClearBlockedDomainsUseCase {
    pub fn new(state: SharedState, repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { state, repository }
    }

    /// Empties the block list. Returns how many domains were removed.
    pub async fn execute(&self) -> usize {
        let removed = self.state.write(|s| {
            let count = s.blocklist.len();
            s.blocklist.clear();
            count
        });

        if let Err(e) = self.repository.save_domains(&[]).await {
            warn!(error = %e, "Failed to persist block list");
        }
        info!(removed, "Block list cleared");
        removed
    }
}
