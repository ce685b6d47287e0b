use std::sync::Arc;
use tracing::{info, warn};

use crate::ports::{BlocklistRepository, SettingsRepository};
use crate::state::SharedState;

/// Loads the persisted block list and upstream resolver into shared state at
/// startup.
pub struct RestoreRouterStateUseCase {
    state: SharedState,
    blocklist_repo: Arc<dyn BlocklistRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
}

impl RestoreRouterStateUseCase {
    pub fn new(
        state: SharedState,
        blocklist_repo: Arc<dyn BlocklistRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            state,
            blocklist_repo,
            settings_repo,
        }
    }

    /// `seed_domains` populate the block list only when nothing has been
    /// persisted yet. Load failures leave the configured defaults in place.
    pub async fn execute(&self, seed_domains: &[String]) {
        let persisted = match self.blocklist_repo.load_domains().await {
            Ok(domains) => domains,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted block list");
                Vec::new()
            }
        };

        let seeding = persisted.is_empty() && !seed_domains.is_empty();
        let source = if seeding { seed_domains } else { &persisted[..] };

        let (domains, rejected) = self.state.write(|s| {
            s.blocklist.clear();
            let rejected: Vec<_> = source
                .iter()
                .filter_map(|domain| s.blocklist.add(domain).err().map(|e| (domain, e)))
                .collect();
            (s.blocklist.domains().to_vec(), rejected)
        });
        for (domain, error) in &rejected {
            warn!(domain = %domain, error = %error, "Skipping block list entry");
        }

        if seeding {
            if let Err(e) = self.blocklist_repo.save_domains(&domains).await {
                warn!(error = %e, "Failed to persist seeded block list");
            }
        }

        match self.settings_repo.load_upstream().await {
            Ok(Some(upstream)) => self.state.write(|s| s.upstream = upstream),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to load persisted upstream resolver"),
        }

        info!(
            blocked_domains = domains.len(),
            seeded = seeding,
            upstream = %self.state.upstream(),
            "Router state restored"
        );
    }
}
