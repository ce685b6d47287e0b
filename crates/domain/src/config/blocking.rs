use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockingConfig {
    /// Domains seeded into the block list on first start, before any
    /// persisted list exists.
    #[serde(default)]
    pub custom_blocked: Vec<String>,

    #[serde(default = "default_max_domains")]
    pub max_domains: usize,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            custom_blocked: vec![],
            max_domains: default_max_domains(),
        }
    }
}

fn default_max_domains() -> usize {
    100
}
