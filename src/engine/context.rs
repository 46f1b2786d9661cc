use serde::{Deserialize, Serialize};

use super::constants::port;

/// How the UDP decoder bounds the datagram payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UdpLengthPolicy {
    /// Everything after the 8-byte header, including any link-layer padding.
    #[default]
    Lenient,
    /// Cut the payload at `declared_length - 8` when the declared length fits
    /// the captured bytes; fall back to lenient otherwise.
    Declared,
}

/// Control characters that may appear in a payload rendered as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextControls {
    /// Printable ASCII only.
    None,
    /// Printable ASCII plus carriage return, line feed and tab.
    #[default]
    Whitespace,
}

impl TextControls {
    pub fn admits(self, c: char) -> bool {
        match self {
            TextControls::None => false,
            TextControls::Whitespace => matches!(c, '\r' | '\n' | '\t'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub wrap_width: usize,
    pub text_controls: TextControls,
    pub udp_length: UdpLengthPolicy,
    pub dns_port: u16,
    pub http_probe_len: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            wrap_width: 60,
            text_controls: TextControls::Whitespace,
            udp_length: UdpLengthPolicy::Lenient,
            dns_port: port::DNS,
            http_probe_len: 10,
        }
    }
}
