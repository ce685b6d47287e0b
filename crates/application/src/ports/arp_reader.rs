use airgate_domain::{DomainError, MacAddress};
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;

pub type ArpTable = HashMap<MacAddress, IpAddr>;

#[async_trait]
pub trait ArpReader: Send + Sync {
    async fn read_arp_table(&self) -> Result<ArpTable, DomainError>;
}
