#![allow(dead_code)]

pub mod dns_server_mock;

pub use dns_server_mock::{answer_for, MockUpstream, UpstreamMode, ANSWER_IP};

use airgate_application::{RouterState, SharedState};
use airgate_domain::{BlockList, DeviceTable};
use std::net::SocketAddr;

pub fn router_state(blocked: &[&str], upstream: SocketAddr) -> SharedState {
    SharedState::new(RouterState::new(
        DeviceTable::new(16),
        BlockList::from_domains(blocked.iter().copied(), 100),
        upstream,
    ))
}
