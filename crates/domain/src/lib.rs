//! Airgate Domain Layer
pub mod blocklist;
pub mod config;
pub mod device_table;
pub mod domain_name;
pub mod errors;
pub mod mac_address;
pub mod tracked_device;
pub mod traffic;
pub mod upstream;

pub use blocklist::BlockList;
pub use config::{CliOverrides, Config, ConfigError};
pub use device_table::{Admission, DeviceTable, RecordOutcome};
pub use domain_name::{domain_matches, normalize_domain};
pub use errors::DomainError;
pub use mac_address::MacAddress;
pub use tracked_device::{DeviceCounters, TrackedDevice};
pub use traffic::{Direction, FrameKind, FrameMeta, TrafficEvent};
pub use upstream::parse_upstream;
