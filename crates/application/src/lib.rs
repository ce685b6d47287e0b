//! Airgate Application Layer
pub mod ports;
pub mod services;
pub mod state;
pub mod stats;
pub mod use_cases;

pub use services::TrafficAccountant;
pub use state::{RouterState, SharedState};
pub use stats::{DnsStats, DnsStatsSnapshot};
