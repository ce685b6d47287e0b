//! Single-file JSON store backing every persistence port.
//!
//! ```json
//! {
//!   "version": "1",
//!   "devices": { "02AABBCCDD01": { "upload_bytes": 10, "download_bytes": 20 } },
//!   "blocklist": { "count": 1, "domains": ["ads.example.com"] },
//!   "upstream": "1.1.1.1:53",
//!   "names": { "02AABBCCDD01": "Phone" }
//! }
//! ```
//!
//! Every save re-reads the file, applies its own change and rewrites the
//! whole file through a temporary file and a rename, so writers sharing the
//! path (the daemon and an admin command) only replace the keys they touch.
//! The previous file is kept as `.backup` and used when the main file fails
//! to parse.

use super::PersistedState;
use airgate_application::ports::{
    BlocklistRepository, DeviceNameRepository, DeviceStatsRepository, SettingsRepository,
};
use airgate_domain::{DeviceCounters, DomainError, MacAddress};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

const STORE_FILE_VERSION: &str = "1";

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: String,
    #[serde(flatten)]
    state: PersistedState,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    io: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store at `path`, recovering from the backup when the main
    /// file is corrupt. A missing file starts empty.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    DomainError::Persistence(format!(
                        "Failed to create state directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let state = Self::load_with_recovery(&path).await?;
        debug!(
            path = %path.display(),
            devices = state.devices.len(),
            blocked = state.blocklist.domains.len(),
            "State store opened"
        );

        Ok(Self {
            path,
            io: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_with_recovery(path: &Path) -> Result<PersistedState, DomainError> {
        match Self::load(path).await {
            Ok(state) => Ok(state),
            Err(LoadError::Io(e)) => Err(DomainError::Persistence(format!(
                "Failed to read state file {}: {}",
                path.display(),
                e
            ))),
            Err(LoadError::Corrupt(e)) => {
                warn!(path = %path.display(), error = %e, "State file corrupted, trying backup");
                let backup = backup_path(path);
                match Self::load(&backup).await {
                    Ok(state) => {
                        info!(devices = state.devices.len(), "Recovered state from backup");
                        if let Err(e) = fs::copy(&backup, path).await {
                            error!(error = %e, "Failed to restore state file from backup");
                        }
                        Ok(state)
                    }
                    Err(e) => {
                        error!(error = ?e, "Backup unusable, starting with empty state");
                        Ok(PersistedState::default())
                    }
                }
            }
        }
    }

    async fn load(path: &Path) -> Result<PersistedState, LoadError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PersistedState::default()),
            Err(e) => return Err(LoadError::Io(e.to_string())),
        };

        let file: StoreFile =
            serde_json::from_str(&content).map_err(|e| LoadError::Corrupt(e.to_string()))?;
        if file.version != STORE_FILE_VERSION {
            warn!(
                expected = STORE_FILE_VERSION,
                found = %file.version,
                "State file version mismatch, loading anyway"
            );
        }
        Ok(file.state)
    }

    async fn write(&self, state: PersistedState) -> Result<(), DomainError> {
        let file = StoreFile {
            version: STORE_FILE_VERSION.to_string(),
            state,
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| DomainError::Persistence(format!("Failed to serialize state: {}", e)))?;

        let temp = temp_path(&self.path);
        let persistence_error = |action: &str, e: std::io::Error| {
            DomainError::Persistence(format!("Failed to {} {}: {}", action, temp.display(), e))
        };
        {
            let mut out = fs::File::create(&temp)
                .await
                .map_err(|e| persistence_error("create", e))?;
            out.write_all(json.as_bytes())
                .await
                .map_err(|e| persistence_error("write", e))?;
            out.flush().await.map_err(|e| persistence_error("flush", e))?;
        }

        if fs::try_exists(&self.path).await.unwrap_or(false) {
            if let Err(e) = fs::copy(&self.path, backup_path(&self.path)).await {
                warn!(error = %e, "Failed to create state backup");
            }
        }

        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| persistence_error("rename", e))?;
        Ok(())
    }

    /// Current file contents.
    async fn snapshot(&self) -> Result<PersistedState, DomainError> {
        let _io = self.io.lock().await;
        Self::load_with_recovery(&self.path).await
    }

    /// Re-reads the file, applies `change` and writes the result.
    async fn update(&self, change: impl FnOnce(&mut PersistedState)) -> Result<(), DomainError> {
        let _io = self.io.lock().await;
        let mut state = Self::load_with_recovery(&self.path).await?;
        change(&mut state);
        self.write(state).await
    }
}

#[derive(Debug)]
enum LoadError {
    Io(String),
    Corrupt(String),
}

fn temp_path(path: &Path) -> PathBuf {
    let mut temp = path.to_path_buf();
    temp.set_extension("tmp");
    temp
}

fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.to_path_buf();
    backup.set_extension("backup");
    backup
}

#[async_trait]
impl DeviceStatsRepository for JsonFileStore {
    async fn load_counters(&self, mac: &MacAddress) -> Result<DeviceCounters, DomainError> {
        Ok(self.snapshot().await?.counters(mac))
    }

    async fn save_counters(
        &self,
        mac: &MacAddress,
        counters: DeviceCounters,
    ) -> Result<(), DomainError> {
        self.update(|s| s.set_counters(mac, counters)).await
    }

    async fn save_all_counters(
        &self,
        entries: &[(MacAddress, DeviceCounters)],
    ) -> Result<(), DomainError> {
        self.update(|s| {
            for (mac, counters) in entries {
                s.set_counters(mac, *counters);
            }
        })
        .await
    }

    async fn clear_all(&self) -> Result<(), DomainError> {
        self.update(|s| s.devices.clear()).await
    }
}

#[async_trait]
impl BlocklistRepository for JsonFileStore {
    async fn load_domains(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.snapshot().await?.blocklist.entries())
    }

    async fn save_domains(&self, domains: &[String]) -> Result<(), DomainError> {
        self.update(|s| s.blocklist.replace(domains)).await
    }
}

#[async_trait]
impl SettingsRepository for JsonFileStore {
    async fn load_upstream(&self) -> Result<Option<SocketAddr>, DomainError> {
        Ok(self.snapshot().await?.upstream)
    }

    async fn save_upstream(&self, upstream: SocketAddr) -> Result<(), DomainError> {
        self.update(|s| s.upstream = Some(upstream)).await
    }
}

#[async_trait]
impl DeviceNameRepository for JsonFileStore {
    async fn load_name(&self, mac: &MacAddress) -> Result<Option<String>, DomainError> {
        Ok(self.snapshot().await?.names.remove(&mac.storage_key()))
    }

    async fn save_name(&self, mac: &MacAddress, name: &str) -> Result<(), DomainError> {
        self.update(|s| {
            s.names.insert(mac.storage_key(), name.to_string());
        })
        .await
    }

    async fn remove_name(&self, mac: &MacAddress) -> Result<(), DomainError> {
        self.update(|s| {
            s.names.remove(&mac.storage_key());
        })
        .await
    }
}
