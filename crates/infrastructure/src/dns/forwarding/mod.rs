pub mod forwarder;
pub mod messages;

pub use forwarder::UpstreamForwarder;
pub use messages::{ForwardRequest, ForwardResponse};
