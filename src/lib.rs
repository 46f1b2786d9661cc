//! Layered decoder for captured Ethernet II frames.
//!
//! [`decode`] turns one raw frame into a [`DecodedPacket`]: the Ethernet
//! header, then ARP or IPv4, then ICMP, TCP or UDP, with a best-effort DNS
//! view on port 53 and a text-or-hex rendering of the innermost payload.

pub mod engine;
pub mod filter;
pub mod layer;
pub mod packet;

pub use engine::{
    DecodeConfig, DecodeError, DecodedPacket, Decoder, LayerFailure, NetworkLayer,
    TransportLayer, decode,
};
pub use filter::{AddressFilter, FilterParseError};
pub use packet::{PayloadKind, PayloadView};
