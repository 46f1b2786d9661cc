//! Application-layer hints: best-effort DNS and an HTTP marker check.

pub mod dns;

pub use dns::{DnsMessage, parse_dns_message};

const HTTP_MARKERS: [&str; 5] = ["GET", "POST", "HTTP", "PUT", "DELETE"];

/// Whether the first `probe_len` bytes of a TCP payload carry an HTTP method
/// or status-line marker. Non-ASCII bytes are skipped before matching.
///
/// This is a display hint only; it never changes how the segment decodes.
pub fn looks_like_http(payload: &[u8], probe_len: usize) -> bool {
    let probe: String = payload
        .iter()
        .take(probe_len)
        .filter(|byte| byte.is_ascii())
        .map(|&byte| char::from(byte))
        .collect();
    HTTP_MARKERS.iter().any(|marker| probe.contains(marker))
}
