use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("Invalid upstream address: {0}")]
    InvalidUpstream(String),

    #[error("Invalid device name: {0}")]
    InvalidDeviceName(String),

    #[error("Block list is full ({0} domains)")]
    BlockListFull(usize),

    #[error("Device not tracked: {0}")]
    DeviceNotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
