use std::net::Ipv4Addr;

use serde::Serialize;

use crate::engine::constants::ip_protocol_name;
use crate::engine::cursor::{Cursor, bit_field, high_nibble, low_nibble};
use crate::engine::error::DecodeError;
use crate::layer::ProtocolProcessor;

pub const IPV4_MIN_HEADER_LEN: usize = 20;

/// IPv4 Header
///
/// The IPv4 header format is defined in RFC 791. A typical header looks like:
///
///   +---------------------------------------------------------------+
///   | Version (4) | IHL (4) | DSCP (6) | ECN (2)                    |
///   +---------------------------------------------------------------+
///   |                     Total Length (16)                         |
///   +---------------------------------------------------------------+
///   |                   Identification (16)                         |
///   +---------------------------------------------------------------+
///   |Flags (3)|         Fragment Offset (13)                        |
///   +---------------------------------------------------------------+
///   |   TTL (8)   |   Protocol (8)    |    Header Checksum (16)     |
///   +---------------------------------------------------------------+
///   |                   Source IP Address (32)                      |
///   +---------------------------------------------------------------+
///   |                Destination IP Address (32)                    |
///   +---------------------------------------------------------------+
///   |             Options (if IHL > 5; Variable length)             |
///   +---------------------------------------------------------------+
///
/// Total length, flags and checksum are surfaced as read; none of them bound
/// or gate decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv4Header {
    /// IP version; surfaced as read, not enforced.
    pub version: u8,
    /// Internet Header Length in 32-bit words.
    pub ihl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    /// Flags (3 bits).
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    /// Header checksum, never verified.
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    /// Header bytes past the fixed 20, present when IHL > 5.
    pub options: Option<Vec<u8>>,
}

impl Ipv4Header {
    /// Header length in bytes (`ihl * 4`); payload begins at this offset.
    pub fn header_len(&self) -> usize {
        usize::from(self.ihl) * 4
    }

    pub fn protocol_name(&self) -> &'static str {
        ip_protocol_name(self.protocol)
    }

    pub fn involves(&self, addr: Ipv4Addr) -> bool {
        self.source == addr || self.destination == addr
    }
}

/// Processor handling IPv4 header parsing.
pub struct Ipv4Processor;

impl ProtocolProcessor for Ipv4Processor {
    type Header = Ipv4Header;
    const NAME: &'static str = "ipv4";

    fn parse<'a>(&self, data: &'a [u8]) -> Result<(Ipv4Header, &'a [u8]), DecodeError> {
        let cursor = Cursor::new(Self::NAME, data);
        cursor.require(IPV4_MIN_HEADER_LEN)?;

        // Byte 0: Version and Internet Header Length (IHL).
        let first_byte = cursor.u8_at(0)?;
        let version = high_nibble(first_byte);
        let ihl = low_nibble(first_byte);
        if ihl < 5 {
            return Err(DecodeError::unsupported(
                Self::NAME,
                "header length",
                ihl.into(),
            ));
        }
        let header_len = usize::from(ihl) * 4;
        cursor.require(header_len)?;

        // Byte 1: DSCP (top 6 bits) and ECN (lower 2 bits).
        let tos = cursor.u8_at(1)?;
        let flags_fragment = cursor.u16_at(6)?;

        let options = if header_len > IPV4_MIN_HEADER_LEN {
            Some(
                cursor
                    .slice_at(IPV4_MIN_HEADER_LEN, header_len - IPV4_MIN_HEADER_LEN)?
                    .to_vec(),
            )
        } else {
            None
        };

        let header = Ipv4Header {
            version,
            ihl,
            dscp: tos >> 2,
            ecn: tos & 0x03,
            total_length: cursor.u16_at(2)?,
            identification: cursor.u16_at(4)?,
            flags: bit_field(flags_fragment, 13, 0x07) as u8,
            fragment_offset: bit_field(flags_fragment, 0, 0x1fff),
            ttl: cursor.u8_at(8)?,
            protocol: cursor.u8_at(9)?,
            checksum: cursor.u16_at(10)?,
            source: Ipv4Addr::from(cursor.array_at::<4>(12)?),
            destination: Ipv4Addr::from(cursor.array_at::<4>(16)?),
            options,
        };

        Ok((header, cursor.tail_from(header_len)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_ipv4_header() -> Vec<u8> {
        vec![
            0x45, // Version 4, IHL 5.
            0x00, // DSCP and ECN.
            0x00, 0x14, // Total Length = 20 bytes.
            0x12, 0x34, // Identification.
            0x40, 0x00, // Flags (010) and Fragment Offset (0).
            64,   // TTL.
            6,    // Protocol (TCP).
            0x00, 0x00, // Checksum (dummy).
            192, 168, 1, 1, // Source IP: 192.168.1.1.
            192, 168, 1, 2, // Destination IP: 192.168.1.2.
        ]
    }

    /// Test parsing a minimal valid IPv4 header (IHL = 5, no options).
    #[test]
    fn test_valid_ipv4_packet() {
        let mut packet = create_valid_ipv4_header();
        packet.extend_from_slice(&[0xca, 0xfe]);

        let (header, payload) = Ipv4Processor
            .parse(&packet)
            .expect("Valid IPv4 packet should be parsed successfully");

        assert_eq!(header.version, 4);
        assert_eq!(header.ihl, 5);
        assert_eq!(header.header_len(), 20);
        assert_eq!(header.dscp, 0);
        assert_eq!(header.ecn, 0);
        assert_eq!(header.total_length, 20);
        assert_eq!(header.identification, 0x1234);
        assert_eq!(header.flags, 2); // 0x40 -> binary 01000000 -> flag = 2.
        assert_eq!(header.fragment_offset, 0);
        assert_eq!(header.ttl, 64);
        assert_eq!(header.protocol, 6);
        assert_eq!(header.protocol_name(), "tcp");
        assert_eq!(header.source.to_string(), "192.168.1.1");
        assert_eq!(header.destination, Ipv4Addr::new(192, 168, 1, 2));
        assert!(header.options.is_none());
        assert_eq!(payload, &[0xca, 0xfe]);
    }

    /// Test parsing an IPv4 header with options (IHL = 6).
    #[test]
    fn test_ipv4_with_options() {
        let mut packet = create_valid_ipv4_header();
        packet[0] = 0x46;
        packet.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0xaa]);

        let (header, payload) = Ipv4Processor
            .parse(&packet)
            .expect("IPv4 packet with options should be parsed successfully");

        assert_eq!(header.ihl, 6);
        assert_eq!(header.header_len(), 24);
        assert_eq!(header.options, Some(vec![0x01, 0x02, 0x03, 0x04]));
        assert_eq!(payload, &[0xaa]);
    }

    #[test]
    fn test_maximum_header_length() {
        let mut packet = create_valid_ipv4_header();
        packet[0] = 0x4f;
        packet.resize(60, 0x01);

        let (header, payload) = Ipv4Processor
            .parse(&packet)
            .expect("a 60-byte header fits exactly");
        assert_eq!(header.header_len(), 60);
        assert!(payload.is_empty());

        packet.truncate(59);
        assert_eq!(
            Ipv4Processor.parse(&packet),
            Err(DecodeError::TruncatedInput {
                layer: "ipv4",
                needed: 60,
                available: 59
            })
        );
    }

    #[test]
    fn test_short_packet() {
        let packet = &create_valid_ipv4_header()[..19];
        assert!(matches!(
            Ipv4Processor.parse(packet),
            Err(DecodeError::TruncatedInput { needed: 20, .. })
        ));
    }

    /// Test that a packet with an IHL value less than 5 returns an error.
    #[test]
    fn test_invalid_ihl() {
        let mut packet = create_valid_ipv4_header();
        packet[0] = 0x44;
        assert!(matches!(
            Ipv4Processor.parse(&packet),
            Err(DecodeError::UnsupportedVariant {
                field: "header length",
                value: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_version_is_not_enforced() {
        let mut packet = create_valid_ipv4_header();
        packet[0] = 0x65;
        let (header, _) = Ipv4Processor
            .parse(&packet)
            .expect("version is surfaced, not checked");
        assert_eq!(header.version, 6);
    }

    #[test]
    fn test_total_length_does_not_bound_payload() {
        let mut packet = create_valid_ipv4_header();
        // Total Length = 40 bytes but only 22 are provided.
        packet[3] = 0x28;
        packet.extend_from_slice(&[1, 2]);
        let (header, payload) = Ipv4Processor.parse(&packet).expect("lenient");
        assert_eq!(header.total_length, 40);
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_fragment_fields() {
        let mut packet = create_valid_ipv4_header();
        packet[6] = 0x20; // More fragments
        packet[7] = 0xb9; // offset 185
        let (header, _) = Ipv4Processor.parse(&packet).expect("parses");
        assert_eq!(header.flags, 1);
        assert_eq!(header.fragment_offset, 185);
        assert!(header.involves(Ipv4Addr::new(192, 168, 1, 2)));
        assert!(!header.involves(Ipv4Addr::new(10, 0, 0, 1)));
    }
}
