//! The datalink layer (Layer 2) modules.
//! This layer handles Ethernet II framing and ARP for IPv4 over Ethernet.

pub mod arp;
pub mod ethernet;

pub use arp::{ArpOperation, ArpPacket, ArpProcessor};
pub use ethernet::{EthernetHeader, EthernetProcessor, MacAddr};
