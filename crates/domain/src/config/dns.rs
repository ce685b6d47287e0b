use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstream resolver used until one is persisted through the admin surface.
    #[serde(default = "default_upstream")]
    pub upstream: String,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    // Response cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Depth of both the request and the response queue between the
    /// control loop and the upstream forwarder.
    #[serde(default = "default_forward_queue_capacity")]
    pub forward_queue_capacity: usize,
}

impl DnsConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream: default_upstream(),
            query_timeout_ms: default_query_timeout_ms(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
            forward_queue_capacity: default_forward_queue_capacity(),
        }
    }
}

fn default_upstream() -> String {
    "1.1.1.1:53".to_string()
}

fn default_query_timeout_ms() -> u64 {
    1000
}

fn default_cache_capacity() -> usize {
    16
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_forward_queue_capacity() -> usize {
    16
}
