//! Single-address traffic filter applied to decoded frames.

use std::fmt;
use std::net::{AddrParseError, Ipv4Addr};
use std::str::FromStr;

use thiserror::Error;

use crate::engine::tree::{DecodedPacket, NetworkLayer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter address {input:?}")]
pub struct FilterParseError {
    input: String,
    #[source]
    source: AddrParseError,
}

/// Keeps frames that involve one IPv4 address.
///
/// An IPv4 packet matches when the address is its source or destination; an
/// ARP message matches on its sender or target protocol address. Frames whose
/// network layer is anything else never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFilter {
    address: Ipv4Addr,
}

impl AddressFilter {
    pub fn new(address: Ipv4Addr) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn matches(&self, packet: &DecodedPacket) -> bool {
        match &packet.network {
            NetworkLayer::Ipv4(ipv4) => ipv4.header.involves(self.address),
            NetworkLayer::Arp(arp) => {
                arp.sender_protocol_addr == self.address || arp.target_protocol_addr == self.address
            }
            NetworkLayer::Unrecognized { .. } | NetworkLayer::Failed(_) => false,
        }
    }
}

impl FromStr for AddressFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<Ipv4Addr>()
            .map(Self::new)
            .map_err(|source| FilterParseError {
                input: trimmed.to_string(),
                source,
            })
    }
}

impl fmt::Display for AddressFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}
