use serde::Serialize;

use crate::engine::cursor::{Cursor, bit_field, bit_flag};
use crate::engine::error::DecodeError;
use crate::layer::ProtocolProcessor;

/// Ports, sequence, acknowledgment and the offset/flags word.
pub const TCP_FIXED_LEN: usize = 14;
pub const TCP_MIN_HEADER_LEN: usize = 20;

/// TCP Flags as defined in RFC 793
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TcpFlags {
    pub fin: bool, // 0x01 - Finish, no more data from sender
    pub syn: bool, // 0x02 - Synchronize sequence numbers
    pub rst: bool, // 0x04 - Reset the connection
    pub psh: bool, // 0x08 - Push function
    pub ack: bool, // 0x10 - Acknowledgment field is significant
    pub urg: bool, // 0x20 - Urgent pointer field is significant
    pub ece: bool, // 0x40 - ECN-Echo
    pub cwr: bool, // 0x80 - Congestion Window Reduced
    pub ns: bool,  // 0x100 - ECN-nonce concealment protection (RFC 3540)
}

impl TcpFlags {
    /// Decodes the flag bits from the combined data-offset/flags word.
    pub fn from_word(word: u16) -> Self {
        Self {
            fin: bit_flag(word, 0),
            syn: bit_flag(word, 1),
            rst: bit_flag(word, 2),
            psh: bit_flag(word, 3),
            ack: bit_flag(word, 4),
            urg: bit_flag(word, 5),
            ece: bit_flag(word, 6),
            cwr: bit_flag(word, 7),
            ns: bit_flag(word, 8),
        }
    }

    /// Names of the six control flags that are set, in URG ACK PSH RST SYN
    /// FIN order.
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.urg, "URG"),
            (self.ack, "ACK"),
            (self.psh, "PSH"),
            (self.rst, "RST"),
            (self.syn, "SYN"),
            (self.fin, "FIN"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

/// Represents a TCP segment header.
///
/// The TCP header format is defined in RFC 793 and consists of:
/// - Source Port (16 bits)
/// - Destination Port (16 bits)
/// - Sequence Number (32 bits)
/// - Acknowledgment Number (32 bits)
/// - Data Offset (4 bits): Size of TCP header in 32-bit words
/// - Reserved (3 bits)
/// - Flags (9 bits): NS, CWR, ECE, URG, ACK, PSH, RST, SYN, FIN
/// - Window Size (16 bits)
/// - Checksum (16 bits)
/// - Urgent Pointer (16 bits)
/// - Options (variable length, optional)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TcpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence_number: u32,
    pub acknowledgment_number: u32,
    pub data_offset: u8,
    pub flags: TcpFlags,
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
    pub options: Option<Vec<u8>>,
}

impl TcpHeader {
    /// Header length in bytes (`data_offset * 4`); payload begins here.
    pub fn header_len(&self) -> usize {
        usize::from(self.data_offset) * 4
    }
}

/// Processor for TCP segments.
pub struct TcpProcessor;

impl ProtocolProcessor for TcpProcessor {
    type Header = TcpHeader;
    const NAME: &'static str = "tcp";

    fn parse<'a>(&self, data: &'a [u8]) -> Result<(TcpHeader, &'a [u8]), DecodeError> {
        let mut cursor = Cursor::new(Self::NAME, data);
        cursor.require(TCP_FIXED_LEN)?;

        let source_port = cursor.read_u16_be()?;
        let destination_port = cursor.read_u16_be()?;
        let sequence_number = cursor.read_u32_be()?;
        let acknowledgment_number = cursor.read_u32_be()?;
        let offset_flags = cursor.read_u16_be()?;

        let data_offset = bit_field(offset_flags, 12, 0x0f) as u8;
        if data_offset < 5 {
            return Err(DecodeError::unsupported(
                Self::NAME,
                "data offset",
                data_offset.into(),
            ));
        }
        let header_len = usize::from(data_offset) * 4;
        cursor.require(header_len)?;

        let window_size = cursor.read_u16_be()?;
        let checksum = cursor.read_u16_be()?;
        let urgent_pointer = cursor.read_u16_be()?;

        let options = if header_len > TCP_MIN_HEADER_LEN {
            Some(cursor.read_exact(header_len - TCP_MIN_HEADER_LEN)?.to_vec())
        } else {
            None
        };

        Ok((
            TcpHeader {
                source_port,
                destination_port,
                sequence_number,
                acknowledgment_number,
                data_offset,
                flags: TcpFlags::from_word(offset_flags),
                window_size,
                checksum,
                urgent_pointer,
                options,
            },
            cursor.rest(),
        ))
    }
}
