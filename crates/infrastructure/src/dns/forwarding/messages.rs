use std::net::SocketAddr;

/// A query the interceptor could not answer locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequest {
    pub packet: Vec<u8>,
    pub client: SocketAddr,
    pub domain: String,
    /// Resolver chosen when the request was enqueued.
    pub upstream: SocketAddr,
}

/// An upstream answer correlated with its [`ForwardRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardResponse {
    pub packet: Vec<u8>,
    pub client: SocketAddr,
    pub domain: String,
}
