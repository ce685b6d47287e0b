use airgate_domain::{BlockList, DeviceTable};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Collections reachable from both the control loop and the admin surface.
#[derive(Debug, Clone)]
pub struct RouterState {
    pub devices: DeviceTable,
    pub blocklist: BlockList,
    pub upstream: SocketAddr,
}

impl RouterState {
    pub fn new(devices: DeviceTable, blocklist: BlockList, upstream: SocketAddr) -> Self {
        Self {
            devices,
            blocklist,
            upstream,
        }
    }
}

/// Process-wide lock around [`RouterState`].
///
/// Access is closure-scoped so the guard is released on every exit path and
/// can never be held across an `.await`. A poisoned lock is recovered rather
/// than propagated.
#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<Mutex<RouterState>>,
}

impl SharedState {
    pub fn new(state: RouterState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&RouterState) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut RouterState) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn upstream(&self) -> SocketAddr {
        self.read(|s| s.upstream)
    }

    pub fn is_blocked(&self, domain: &str) -> bool {
        self.read(|s| s.blocklist.is_blocked(domain))
    }
}
