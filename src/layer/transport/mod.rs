//! The transport layer (Layer 4) modules.
//! This layer handles TCP segments and UDP datagrams carried over IPv4.

pub mod tcp;
pub mod udp;

pub use tcp::{TcpFlags, TcpHeader, TcpProcessor};
pub use udp::{UdpHeader, UdpProcessor};
