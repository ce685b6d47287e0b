use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::info;

const SOCKET_BUFFER_SIZE: usize = 256 * 1024;

/// Binds the client-facing DNS socket.
pub fn bind_dns_socket(addr: SocketAddr) -> anyhow::Result<Arc<UdpSocket>> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_nonblocking(true)?;
    socket
        .bind(&addr.into())
        .map_err(|e| anyhow::anyhow!("Failed to bind DNS socket on {}: {}", addr, e))?;

    let socket = UdpSocket::from_std(socket.into())?;
    info!(bind_address = %addr, "DNS listener bound");
    Ok(Arc::new(socket))
}

/// Local address for the forwarder socket, in the family of `upstream`.
pub fn forwarder_bind_address(upstream: SocketAddr) -> SocketAddr {
    if upstream.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    }
}
