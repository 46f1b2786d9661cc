use serde::Serialize;

use crate::engine::context::UdpLengthPolicy;
use crate::engine::cursor::Cursor;
use crate::engine::error::DecodeError;
use crate::layer::ProtocolProcessor;

pub const UDP_HEADER_LEN: usize = 8;

/// Represents a UDP packet header.
///
/// The UDP header format is defined in RFC 768 and consists of:
///
///   0      7 8     15 16    23 24    31
///  +--------+--------+--------+--------+
///  |     Source      |   Destination   |
///  |      Port       |      Port       |
///  +--------+--------+--------+--------+
///  |                 |                 |
///  |     Length      |    Checksum     |
///  +--------+--------+--------+--------+
///  |                                   |
///  |            Data (variable)        |
///  +-----------------------------------+
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UdpHeader {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
    /// Declared length of header and data in bytes, as read.
    pub length: u16,
    /// Checksum, never verified.
    pub checksum: u16,
}

impl UdpHeader {
    pub fn involves_port(&self, port: u16) -> bool {
        self.source_port == port || self.destination_port == port
    }

    /// Narrows the datagram body according to `policy`.
    ///
    /// Under [`UdpLengthPolicy::Declared`] the body is cut to `length - 8`
    /// when the declared length is sane and fits inside what was captured;
    /// otherwise the full remainder is kept.
    pub fn bounded_payload<'a>(&self, payload: &'a [u8], policy: UdpLengthPolicy) -> &'a [u8] {
        match policy {
            UdpLengthPolicy::Lenient => payload,
            UdpLengthPolicy::Declared => {
                let declared = usize::from(self.length);
                declared
                    .checked_sub(UDP_HEADER_LEN)
                    .and_then(|body| payload.get(..body))
                    .unwrap_or(payload)
            }
        }
    }
}

/// Processor for UDP packets.
pub struct UdpProcessor;

impl ProtocolProcessor for UdpProcessor {
    type Header = UdpHeader;
    const NAME: &'static str = "udp";

    fn parse<'a>(&self, data: &'a [u8]) -> Result<(UdpHeader, &'a [u8]), DecodeError> {
        let mut cursor = Cursor::new(Self::NAME, data);
        cursor.require(UDP_HEADER_LEN)?;

        let header = UdpHeader {
            source_port: cursor.read_u16_be()?,
            destination_port: cursor.read_u16_be()?,
            length: cursor.read_u16_be()?,
            checksum: cursor.read_u16_be()?,
        };

        Ok((header, cursor.rest()))
    }
}
