use std::fmt;

use serde::{Serialize, Serializer};

use crate::engine::cursor::Cursor;
use crate::engine::error::DecodeError;
use crate::layer::ProtocolProcessor;

pub const ICMP_HEADER_LEN: usize = 4;

/// ICMP message types with a display label; everything else keeps its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpType {
    EchoReply,
    DestinationUnreachable,
    EchoRequest,
    Other(u8),
}

impl IcmpType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => IcmpType::EchoReply,
            3 => IcmpType::DestinationUnreachable,
            8 => IcmpType::EchoRequest,
            other => IcmpType::Other(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            IcmpType::EchoReply => 0,
            IcmpType::DestinationUnreachable => 3,
            IcmpType::EchoRequest => 8,
            IcmpType::Other(value) => value,
        }
    }

    pub fn is_echo(self) -> bool {
        matches!(self, IcmpType::EchoReply | IcmpType::EchoRequest)
    }
}

impl fmt::Display for IcmpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IcmpType::EchoReply => f.write_str("echo reply"),
            IcmpType::DestinationUnreachable => f.write_str("destination unreachable"),
            IcmpType::EchoRequest => f.write_str("echo request"),
            IcmpType::Other(value) => write!(f, "{}", value),
        }
    }
}

impl Serialize for IcmpType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.to_u8())
    }
}

/// Identifier and sequence number of an echo request or reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IcmpEcho {
    pub identifier: u16,
    pub sequence: u16,
}

/// Represents the basic fields of an ICMP header.
///
///   0                   1                   2                   3
///    0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///   +---------------------------------------------------------------+
///   |     Type      |     Code      |           Checksum            |
///   +---------------------------------------------------------------+
///   |           Rest of Header (variable, depends on type and code) |
///   +---------------------------------------------------------------+
///
/// Everything after the checksum is message data. The checksum is read but
/// never verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IcmpHeader {
    pub icmp_type: IcmpType,
    pub icmp_code: u8,
    pub checksum: u16,
    /// Present for echo request/reply with at least 8 bytes.
    pub echo: Option<IcmpEcho>,
}

impl IcmpHeader {
    pub fn type_label(&self) -> String {
        self.icmp_type.to_string()
    }
}

pub struct IcmpProcessor;

impl ProtocolProcessor for IcmpProcessor {
    type Header = IcmpHeader;
    const NAME: &'static str = "icmp";

    fn parse<'a>(&self, data: &'a [u8]) -> Result<(IcmpHeader, &'a [u8]), DecodeError> {
        let mut cursor = Cursor::new(Self::NAME, data);
        cursor.require(ICMP_HEADER_LEN)?;

        let icmp_type = IcmpType::from_u8(cursor.read_u8()?);
        let icmp_code = cursor.read_u8()?;
        let checksum = cursor.read_u16_be()?;

        let echo = if icmp_type.is_echo() {
            match (cursor.u16_at(4), cursor.u16_at(6)) {
                (Ok(identifier), Ok(sequence)) => Some(IcmpEcho {
                    identifier,
                    sequence,
                }),
                _ => None,
            }
        } else {
            None
        };

        Ok((
            IcmpHeader {
                icmp_type,
                icmp_code,
                checksum,
                echo,
            },
            cursor.rest(),
        ))
    }
}
