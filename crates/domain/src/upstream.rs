use crate::errors::DomainError;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

pub const DNS_PORT: u16 = 53;

/// Parses an upstream resolver given either as a bare IPv4 address
/// (`"1.1.1.1"`, port 53 implied) or as `ip:port`.
pub fn parse_upstream(input: &str) -> Result<SocketAddr, DomainError> {
    let trimmed = input.trim();

    if let Ok(ip) = trimmed.parse::<Ipv4Addr>() {
        return Ok(SocketAddr::V4(SocketAddrV4::new(ip, DNS_PORT)));
    }

    match trimmed.parse::<SocketAddr>() {
        Ok(addr @ SocketAddr::V4(_)) if addr.port() != 0 => Ok(addr),
        _ => Err(DomainError::InvalidUpstream(input.to_string())),
    }
}
