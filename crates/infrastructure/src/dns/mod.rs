pub mod block_response;
pub mod cache;
pub mod forwarding;
pub mod interceptor;
pub mod wire;

pub use cache::ResponseCache;
pub use forwarding::{ForwardRequest, ForwardResponse, UpstreamForwarder};
pub use interceptor::{DnsInterceptor, DropReason, InterceptOutcome};
