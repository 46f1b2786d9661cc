use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::engine::context::{DecodeConfig, TextControls};

const BYTES_PER_ROW: usize = 16;
// 16 bytes as "XX " minus the trailing space, plus one pad column.
const HEX_COLUMN_WIDTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// Every character is printable ASCII or an admitted control character.
    Text,
    HexDump,
    /// Bytes a decoder did not dissect; rendered as a hex dump without
    /// attempting text classification.
    Unclassified,
}

/// A rendering decision over an opaque byte slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadView {
    pub kind: PayloadKind,
    pub bytes: Vec<u8>,
    pub rendered: String,
}

impl PayloadView {
    /// Classifies `bytes` as text or binary. Never fails: anything that is
    /// not clean text falls through to the hex dump.
    pub fn classify(bytes: &[u8], config: &DecodeConfig) -> Self {
        match as_text(bytes, config.text_controls) {
            Some(text) => Self {
                kind: PayloadKind::Text,
                bytes: bytes.to_vec(),
                rendered: wrap_text(text, config.wrap_width),
            },
            None => Self {
                kind: PayloadKind::HexDump,
                bytes: bytes.to_vec(),
                rendered: hex_dump(bytes),
            },
        }
    }

    pub fn unclassified(bytes: &[u8]) -> Self {
        Self {
            kind: PayloadKind::Unclassified,
            bytes: bytes.to_vec(),
            rendered: hex_dump(bytes),
        }
    }

    /// `None` for an empty slice, so layers only carry a view when there is
    /// trailing data worth showing.
    pub fn non_empty(bytes: &[u8], config: &DecodeConfig) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Some(Self::classify(bytes, config))
    }

    pub fn is_text(&self) -> bool {
        self.kind == PayloadKind::Text
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for PayloadView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

fn as_text(bytes: &[u8], controls: TextControls) -> Option<&str> {
    let text = std::str::from_utf8(bytes).ok()?;
    let clean = text
        .chars()
        .all(|c| matches!(c, ' '..='~') || controls.admits(c));
    clean.then_some(text)
}

/// Greedy word wrap: whitespace runs collapse to one space, lines hold at
/// most `width` characters, and longer words are split.
pub fn wrap_text(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        if !line.is_empty() && line.len() + 1 + word.len() <= width {
            line.push(' ');
            line.push_str(word);
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        // Words are ASCII here, so byte offsets are char boundaries.
        while word.len() > width {
            let (head, tail) = word.split_at(width);
            lines.push(head.to_string());
            word = tail;
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines.join("\n")
}

/// Rows of `OOOO  XX XX .. XX  ascii`, 16 bytes per row, offsets and hex in
/// uppercase, non-printable bytes shown as `.` in the ASCII column.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();

    for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        if row > 0 {
            out.push('\n');
        }

        let hex_part = chunk
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii_part: String = chunk.iter().map(|&b| printable_or_dot(b)).collect();

        let _ = write!(
            out,
            "{:04X}  {:<width$}  {}",
            row * BYTES_PER_ROW,
            hex_part,
            ascii_part,
            width = HEX_COLUMN_WIDTH
        );
    }

    out
}

fn printable_or_dot(byte: u8) -> char {
    if (0x20..=0x7e).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}
