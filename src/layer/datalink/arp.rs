use std::fmt;
use std::net::Ipv4Addr;

use serde::{Serialize, Serializer};

use super::ethernet::MacAddr;
use crate::engine::cursor::Cursor;
use crate::engine::error::DecodeError;
use crate::layer::ProtocolProcessor;

/// Length of an ARP message for Ethernet hardware and IPv4 protocol addresses.
pub const ARP_MESSAGE_LEN: usize = 28;

/// ARP operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOperation {
    Request,
    Reply,
    /// For unrecognized operation codes.
    Unknown(u16),
}

impl ArpOperation {
    /// Convert a 16-bit value into an ArpOperation.
    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => ArpOperation::Request,
            2 => ArpOperation::Reply,
            other => ArpOperation::Unknown(other),
        }
    }

    /// Get the numeric value of the operation.
    pub fn to_u16(self) -> u16 {
        match self {
            ArpOperation::Request => 1,
            ArpOperation::Reply => 2,
            ArpOperation::Unknown(code) => code,
        }
    }
}

impl fmt::Display for ArpOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArpOperation::Request => f.write_str("request"),
            ArpOperation::Reply => f.write_str("reply"),
            ArpOperation::Unknown(code) => write!(f, "{}", code),
        }
    }
}

impl Serialize for ArpOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Represents an ARP packet as defined in RFC 826.
///
///   +-------------------------------+-------------------------------+
///   | Hardware Type (16)            | Protocol Type (16)            |
///   +---------------+---------------+-------------------------------+
///   | HW Len (8)    | Proto Len (8) | Operation (16)                |
///   +---------------+---------------+-------------------------------+
///   | Sender Hardware Address (48)  | Sender Protocol Address (32)  |
///   +-------------------------------+-------------------------------+
///   | Target Hardware Address (48)  | Target Protocol Address (32)  |
///   +-------------------------------+-------------------------------+
///
/// Only the Ethernet/IPv4 layout (6-byte hardware and 4-byte protocol
/// addresses) is understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArpPacket {
    /// Link-layer protocol type (e.g., 1 for Ethernet).
    pub hardware_type: u16,
    /// Network-layer protocol type (e.g., 0x0800 for IPv4).
    pub protocol_type: u16,
    pub hardware_len: u8,
    pub protocol_len: u8,
    pub operation: ArpOperation,
    pub sender_hardware_addr: MacAddr,
    pub sender_protocol_addr: Ipv4Addr,
    pub target_hardware_addr: MacAddr,
    pub target_protocol_addr: Ipv4Addr,
}

/// A processor for ARP packets.
pub struct ArpProcessor;

impl ProtocolProcessor for ArpProcessor {
    type Header = ArpPacket;
    const NAME: &'static str = "arp";

    fn parse<'a>(&self, data: &'a [u8]) -> Result<(ArpPacket, &'a [u8]), DecodeError> {
        let mut cursor = Cursor::new(Self::NAME, data);
        cursor.require(ARP_MESSAGE_LEN)?;

        let hardware_type = cursor.read_u16_be()?;
        let protocol_type = cursor.read_u16_be()?;
        let hardware_len = cursor.read_u8()?;
        let protocol_len = cursor.read_u8()?;

        if hardware_len != 6 {
            return Err(DecodeError::unsupported(
                Self::NAME,
                "hardware address length",
                hardware_len.into(),
            ));
        }
        if protocol_len != 4 {
            return Err(DecodeError::unsupported(
                Self::NAME,
                "protocol address length",
                protocol_len.into(),
            ));
        }

        let operation = ArpOperation::from_u16(cursor.read_u16_be()?);
        let sender_hardware_addr = MacAddr(cursor.read_array::<6>()?);
        let sender_protocol_addr = Ipv4Addr::from(cursor.read_array::<4>()?);
        let target_hardware_addr = MacAddr(cursor.read_array::<6>()?);
        let target_protocol_addr = Ipv4Addr::from(cursor.read_array::<4>()?);

        Ok((
            ArpPacket {
                hardware_type,
                protocol_type,
                hardware_len,
                protocol_len,
                operation,
                sender_hardware_addr,
                sender_protocol_addr,
                target_hardware_addr,
                target_protocol_addr,
            },
            cursor.rest(),
        ))
    }
}
