pub mod payload;

pub use payload::{PayloadKind, PayloadView, hex_dump, wrap_text};
