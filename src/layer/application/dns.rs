use serde::Serialize;
use tracing::{debug, trace};

use crate::engine::cursor::{Cursor, bit_field, bit_flag};
use crate::engine::error::DecodeError;

pub const DNS_HEADER_LEN: usize = 12;

const LAYER: &str = "dns";
const POINTER_MASK: u8 = 0xC0;

/// Best-effort view of a DNS message: the fixed header and the first
/// question's name.
///
/// `query_name` holds each label followed by a dot (`"example.com."`). It is
/// empty when there is no question, when the name starts with or reaches a
/// compression pointer, or when it runs off the end of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsMessage {
    pub transaction_id: u16,
    pub is_response: bool,
    pub opcode: u8,
    pub rcode: u8,
    pub questions: u16,
    pub answers: u16,
    pub authorities: u16,
    pub additionals: u16,
    pub query_name: String,
    /// Type and class of the first question, when its name was read completely.
    pub query_type: Option<u16>,
    pub query_class: Option<u16>,
}

impl DnsMessage {
    pub fn kind_label(&self) -> &'static str {
        if self.is_response { "response" } else { "query" }
    }
}

/// Outcome of reading a label sequence.
enum NameRead {
    /// Name terminated by a zero label; `end` is the offset just past it.
    Complete { name: String, end: usize },
    /// A compression pointer or the end of the buffer came first.
    Abandoned,
}

/// Decodes a DNS message from a UDP payload.
///
/// Returns `None` only when the 12-byte header is missing. A malformed
/// question section degrades to an empty name rather than a failure.
pub fn parse_dns_message(data: &[u8]) -> Option<DnsMessage> {
    match parse_header(data) {
        Ok(message) => Some(message),
        Err(error) => {
            debug!(%error, "payload is not a DNS message");
            None
        }
    }
}

fn parse_header(data: &[u8]) -> Result<DnsMessage, DecodeError> {
    let mut cursor = Cursor::new(LAYER, data);
    cursor.require(DNS_HEADER_LEN)?;

    let transaction_id = cursor.read_u16_be()?;
    let flags = cursor.read_u16_be()?;
    let questions = cursor.read_u16_be()?;
    let answers = cursor.read_u16_be()?;
    let authorities = cursor.read_u16_be()?;
    let additionals = cursor.read_u16_be()?;

    let mut message = DnsMessage {
        transaction_id,
        is_response: bit_flag(flags, 15),
        opcode: bit_field(flags, 11, 0x0f) as u8,
        rcode: bit_field(flags, 0, 0x0f) as u8,
        questions,
        answers,
        authorities,
        additionals,
        query_name: String::new(),
        query_type: None,
        query_class: None,
    };

    if questions == 0 {
        return Ok(message);
    }

    match read_name(&cursor, DNS_HEADER_LEN) {
        NameRead::Complete { name, end } => {
            message.query_name = name;
            if let (Ok(qtype), Ok(qclass)) = (cursor.u16_at(end), cursor.u16_at(end + 2)) {
                message.query_type = Some(qtype);
                message.query_class = Some(qclass);
            }
        }
        NameRead::Abandoned => {
            trace!(transaction_id, "query name not decoded");
        }
    }

    Ok(message)
}

fn read_name(cursor: &Cursor<'_>, start: usize) -> NameRead {
    let mut name = String::new();
    let mut pos = start;

    loop {
        let Ok(len) = cursor.u8_at(pos) else {
            return NameRead::Abandoned;
        };
        if len == 0 {
            return NameRead::Complete { name, end: pos + 1 };
        }
        if len & POINTER_MASK == POINTER_MASK {
            return NameRead::Abandoned;
        }

        let Ok(label) = cursor.slice_at(pos + 1, usize::from(len)) else {
            return NameRead::Abandoned;
        };
        name.extend(
            String::from_utf8_lossy(label)
                .chars()
                .filter(|&c| c != char::REPLACEMENT_CHARACTER),
        );
        name.push('.');
        pos += 1 + usize::from(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Standard query for example.com, type A, class IN.
    fn create_dns_query() -> Vec<u8> {
        vec![
            0x12, 0x34, // Transaction ID
            0x01, 0x00, // Flags: standard query, recursion desired
            0x00, 0x01, // Questions: 1
            0x00, 0x00, // Answer RRs: 0
            0x00, 0x00, // Authority RRs: 0
            0x00, 0x00, // Additional RRs: 0
            // Query: example.com
            0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00,
            0x00, 0x01, // Type: A
            0x00, 0x01, // Class: IN
        ]
    }

    #[test]
    fn test_parse_dns_query() {
        let message = parse_dns_message(&create_dns_query()).expect("header is complete");

        assert_eq!(message.transaction_id, 0x1234);
        assert!(!message.is_response);
        assert_eq!(message.kind_label(), "query");
        assert_eq!(message.opcode, 0);
        assert_eq!(message.rcode, 0);
        assert_eq!(message.questions, 1);
        assert_eq!(message.query_name, "example.com.");
        assert_eq!(message.query_type, Some(1));
        assert_eq!(message.query_class, Some(1));
    }

    #[test]
    fn test_response_flags() {
        let mut packet = create_dns_query();
        // QR=1, opcode=2, rcode=3 (NXDOMAIN)
        packet[2] = 0x90;
        packet[3] = 0x03;
        let message = parse_dns_message(&packet).expect("parses");
        assert!(message.is_response);
        assert_eq!(message.kind_label(), "response");
        assert_eq!(message.opcode, 2);
        assert_eq!(message.rcode, 3);
    }

    #[test]
    fn test_compression_pointer_gives_empty_name() {
        let mut packet = create_dns_query()[..12].to_vec();
        packet.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01]);
        let message = parse_dns_message(&packet).expect("header is complete");
        assert_eq!(message.query_name, "");
        assert_eq!(message.query_type, None);
    }

    #[test]
    fn test_pointer_after_label_discards_partial_name() {
        let mut packet = create_dns_query()[..12].to_vec();
        packet.extend_from_slice(&[0x03, b'w', b'w', b'w', 0xc0, 0x0c]);
        let message = parse_dns_message(&packet).expect("parses");
        assert_eq!(message.query_name, "");
    }

    #[test]
    fn test_truncated_name() {
        let packet = &create_dns_query()[..16];
        let message = parse_dns_message(packet).expect("header is complete");
        assert_eq!(message.query_name, "");
        assert_eq!(message.questions, 1);
    }

    #[test]
    fn test_name_without_type_and_class() {
        let packet = &create_dns_query()[..25];
        let message = parse_dns_message(packet).expect("parses");
        assert_eq!(message.query_name, "example.com.");
        assert_eq!(message.query_type, None);
        assert_eq!(message.query_class, None);
    }

    #[test]
    fn test_no_questions_skips_name() {
        let mut packet = create_dns_query();
        packet[5] = 0x00;
        let message = parse_dns_message(&packet).expect("parses");
        assert_eq!(message.questions, 0);
        assert_eq!(message.query_name, "");
    }

    #[test]
    fn test_root_name_is_empty() {
        let mut packet = create_dns_query()[..12].to_vec();
        packet.extend_from_slice(&[0x00, 0x00, 0x02, 0x00, 0x01]);
        let message = parse_dns_message(&packet).expect("parses");
        assert_eq!(message.query_name, "");
        assert_eq!(message.query_type, Some(2));
    }

    #[test]
    fn test_invalid_utf8_label_bytes_are_dropped() {
        let mut packet = create_dns_query()[..12].to_vec();
        packet.extend_from_slice(&[0x03, b'a', 0xff, b'b', 0x00]);
        let message = parse_dns_message(&packet).expect("parses");
        assert_eq!(message.query_name, "ab.");
    }

    #[test]
    fn test_short_header() {
        assert!(parse_dns_message(&create_dns_query()[..11]).is_none());
        assert!(parse_dns_message(&[]).is_none());
    }
}
