pub mod constants;
pub mod context;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod tree;

pub use context::{DecodeConfig, TextControls, UdpLengthPolicy};
pub use cursor::Cursor;
pub use decoder::{Decoder, decode};
pub use error::DecodeError;
pub use tree::{
    DecodedPacket, IcmpMessage, Ipv4Packet, LayerFailure, NetworkLayer, TcpSegment,
    TransportLayer, UdpDatagram,
};
