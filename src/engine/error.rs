use serde::Serialize;
use thiserror::Error;

/// Failure of a single protocol layer.
///
/// Every variant names the layer that produced it so a caller holding only
/// the error can still tell which header was not understood.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    /// The buffer is shorter than the fixed or declared length of the header.
    #[error("{layer}: truncated input (need {needed} bytes, have {available})")]
    TruncatedInput {
        layer: &'static str,
        needed: usize,
        available: usize,
    },
    /// A structural field holds a value this decoder does not understand.
    #[error("{layer}: unsupported {field} value {value}")]
    UnsupportedVariant {
        layer: &'static str,
        field: &'static str,
        value: u32,
    },
}

impl DecodeError {
    pub fn truncated(layer: &'static str, needed: usize, available: usize) -> Self {
        DecodeError::TruncatedInput {
            layer,
            needed,
            available,
        }
    }

    pub fn unsupported(layer: &'static str, field: &'static str, value: u32) -> Self {
        DecodeError::UnsupportedVariant {
            layer,
            field,
            value,
        }
    }

    pub fn layer(&self) -> &'static str {
        match *self {
            DecodeError::TruncatedInput { layer, .. } => layer,
            DecodeError::UnsupportedVariant { layer, .. } => layer,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::TruncatedInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::DecodeError;

    #[test]
    fn display_names_the_layer() {
        let err = DecodeError::truncated("tcp", 20, 12);
        assert_eq!(
            err.to_string(),
            "tcp: truncated input (need 20 bytes, have 12)"
        );
        assert_eq!(err.layer(), "tcp");
        assert!(err.is_truncated());

        let err = DecodeError::unsupported("arp", "hardware length", 8);
        assert_eq!(err.to_string(), "arp: unsupported hardware length value 8");
        assert!(!err.is_truncated());
    }
}
