pub mod application; // Layer 7 - DNS, HTTP hint
pub mod datalink; // Layer 2 - Ethernet frames, ARP
pub mod network; // Layer 3 - IPv4, ICMP
pub mod transport; // Layer 4 - TCP/UDP

use crate::engine::error::DecodeError;

/// A fixed-layout header decoder.
///
/// `parse` reads one header from the front of `data` and returns it together
/// with the bytes that follow it. Implementations read through
/// [`Cursor`](crate::engine::cursor::Cursor) only and never index `data`
/// directly.
pub trait ProtocolProcessor {
    type Header;

    /// Protocol name used in errors and log events.
    const NAME: &'static str;

    fn parse<'a>(&self, data: &'a [u8]) -> Result<(Self::Header, &'a [u8]), DecodeError>;
}
