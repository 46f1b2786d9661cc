pub mod icmp;
pub mod ipv4;

pub use icmp::{IcmpEcho, IcmpHeader, IcmpProcessor, IcmpType};
pub use ipv4::{Ipv4Header, Ipv4Processor};
