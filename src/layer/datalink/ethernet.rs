use std::fmt;

use serde::{Serialize, Serializer};

use crate::engine::constants::ethertype_name;
use crate::engine::cursor::Cursor;
use crate::engine::error::DecodeError;
use crate::layer::ProtocolProcessor;

pub const ETHERNET_HEADER_LEN: usize = 14;

/// A 48-bit hardware address.
///
/// Displays as uppercase colon-separated octets, e.g. `00:1A:2B:3C:4D:5E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xff; 6]
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        MacAddr(octets)
    }
}

/// Ethernet II header.
///
///   +-------------------+-------------------+-------------+
///   | Destination (6)   | Source (6)        | Type (2)    |
///   +-------------------+-------------------+-------------+
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EthernetHeader {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ethertype: u16,
}

impl EthernetHeader {
    pub fn ethertype_name(&self) -> &'static str {
        ethertype_name(self.ethertype)
    }
}

pub struct EthernetProcessor;

impl ProtocolProcessor for EthernetProcessor {
    type Header = EthernetHeader;
    const NAME: &'static str = "ethernet";

    fn parse<'a>(&self, data: &'a [u8]) -> Result<(EthernetHeader, &'a [u8]), DecodeError> {
        let mut cursor = Cursor::new(Self::NAME, data);
        cursor.require(ETHERNET_HEADER_LEN)?;

        let destination = MacAddr(cursor.read_array::<6>()?);
        let source = MacAddr(cursor.read_array::<6>()?);
        let ethertype = cursor.read_u16_be()?;

        Ok((
            EthernetHeader {
                destination,
                source,
                ethertype,
            },
            cursor.rest(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_frame() -> Vec<u8> {
        vec![
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // Destination: broadcast
            0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e, // Source
            0x08, 0x06, // EtherType: ARP
            0xde, 0xad, // Payload
        ]
    }

    #[test]
    fn test_parse_header_and_payload() {
        let frame = create_test_frame();
        let (header, rest) = EthernetProcessor
            .parse(&frame)
            .expect("Ethernet header should parse");

        assert!(header.destination.is_broadcast());
        assert_eq!(header.source.to_string(), "00:1A:2B:3C:4D:5E");
        assert_eq!(header.ethertype, 0x0806);
        assert_eq!(header.ethertype_name(), "arp");
        assert_eq!(rest, &[0xde, 0xad]);
    }

    #[test]
    fn test_header_only_frame_has_empty_payload() {
        let frame = &create_test_frame()[..ETHERNET_HEADER_LEN];
        let (_, rest) = EthernetProcessor
            .parse(frame)
            .expect("14 bytes is a complete header");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_short_frame() {
        let frame = &create_test_frame()[..13];
        let result = EthernetProcessor.parse(frame);
        assert_eq!(
            result,
            Err(DecodeError::TruncatedInput {
                layer: "ethernet",
                needed: 14,
                available: 13
            })
        );
    }

    #[test]
    fn test_mac_display_is_uppercase() {
        let mac = MacAddr([0xaa, 0xbb, 0xcc, 0x0d, 0x0e, 0x0f]);
        assert_eq!(mac.to_string(), "AA:BB:CC:0D:0E:0F");
    }
}
