use crate::di::Stores;
use airgate_infrastructure::persistence::{JsonFileStore, MemoryStore};
use std::sync::Arc;
use tracing::{error, info};

/// Path value selecting the volatile in-memory store.
pub const MEMORY_STORAGE: &str = ":memory:";

pub async fn open_stores(path: &str) -> anyhow::Result<Stores> {
    if path.is_empty() || path == MEMORY_STORAGE {
        info!("Using in-memory storage, state is lost on exit");
        return Ok(Stores::from_backend(Arc::new(MemoryStore::new())));
    }

    let store = JsonFileStore::open(path).await.map_err(|e| {
        error!(path, error = %e, "Failed to open state store");
        anyhow::anyhow!(e)
    })?;
    info!(path = %store.path().display(), "State store ready");
    Ok(Stores::from_backend(Arc::new(store)))
}
