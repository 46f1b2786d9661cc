//! The decoded-packet tree.
//!
//! A [`DecodedPacket`] always carries the Ethernet header. Below that each
//! level is an enum naming which decoder fired, so a frame is either ARP or
//! IPv4, and an IPv4 packet carries exactly one transport node. A layer that
//! failed to decode becomes a [`LayerFailure`] holding the bytes it could not
//! interpret; the layers above it are kept.

use serde::Serialize;

use super::error::DecodeError;
use crate::layer::application::DnsMessage;
use crate::layer::datalink::{ArpPacket, EthernetHeader};
use crate::layer::network::{IcmpHeader, Ipv4Header};
use crate::layer::transport::{TcpHeader, UdpHeader};
use crate::packet::PayloadView;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedPacket {
    pub ethernet: EthernetHeader,
    pub network: NetworkLayer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum NetworkLayer {
    Arp(ArpPacket),
    Ipv4(Ipv4Packet),
    /// Ethertype with no decoder; the bytes after the Ethernet header.
    Unrecognized { ethertype: u16, payload: PayloadView },
    Failed(LayerFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv4Packet {
    pub header: Ipv4Header,
    pub transport: TransportLayer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum TransportLayer {
    Icmp(IcmpMessage),
    Tcp(TcpSegment),
    Udp(UdpDatagram),
    /// IP protocol with no decoder; the bytes after the IPv4 header.
    Unrecognized { protocol: u8, payload: PayloadView },
    Failed(LayerFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IcmpMessage {
    pub header: IcmpHeader,
    pub data: Option<PayloadView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TcpSegment {
    pub header: TcpHeader,
    pub payload: Option<PayloadView>,
    /// The payload opens with an HTTP method or status marker.
    pub http_hint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UdpDatagram {
    pub header: UdpHeader,
    pub payload: Option<PayloadView>,
    pub dns: Option<DnsMessage>,
}

/// A layer whose header could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerFailure {
    pub protocol: &'static str,
    pub error: DecodeError,
    /// The undecoded bytes, shown as a hex dump.
    pub payload: PayloadView,
}

impl LayerFailure {
    pub fn new(protocol: &'static str, error: DecodeError, bytes: &[u8]) -> Self {
        Self {
            protocol,
            error,
            payload: PayloadView::unclassified(bytes),
        }
    }
}

impl DecodedPacket {
    pub fn arp(&self) -> Option<&ArpPacket> {
        match &self.network {
            NetworkLayer::Arp(arp) => Some(arp),
            _ => None,
        }
    }

    pub fn ipv4(&self) -> Option<&Ipv4Packet> {
        match &self.network {
            NetworkLayer::Ipv4(packet) => Some(packet),
            _ => None,
        }
    }

    pub fn transport(&self) -> Option<&TransportLayer> {
        self.ipv4().map(|packet| &packet.transport)
    }

    pub fn icmp(&self) -> Option<&IcmpMessage> {
        match self.transport()? {
            TransportLayer::Icmp(message) => Some(message),
            _ => None,
        }
    }

    pub fn tcp(&self) -> Option<&TcpSegment> {
        match self.transport()? {
            TransportLayer::Tcp(segment) => Some(segment),
            _ => None,
        }
    }

    pub fn udp(&self) -> Option<&UdpDatagram> {
        match self.transport()? {
            TransportLayer::Udp(datagram) => Some(datagram),
            _ => None,
        }
    }

    pub fn dns(&self) -> Option<&DnsMessage> {
        self.udp()?.dns.as_ref()
    }

    /// The innermost layer that failed to decode, if any.
    pub fn failure(&self) -> Option<&LayerFailure> {
        match &self.network {
            NetworkLayer::Failed(failure) => Some(failure),
            NetworkLayer::Ipv4(Ipv4Packet {
                transport: TransportLayer::Failed(failure),
                ..
            }) => Some(failure),
            _ => None,
        }
    }

    /// Names of the layers that decoded, outermost first.
    pub fn layer_names(&self) -> Vec<&'static str> {
        let mut names = vec!["ethernet"];
        match &self.network {
            NetworkLayer::Arp(_) => names.push("arp"),
            NetworkLayer::Ipv4(packet) => {
                names.push("ipv4");
                match &packet.transport {
                    TransportLayer::Icmp(_) => names.push("icmp"),
                    TransportLayer::Tcp(_) => names.push("tcp"),
                    TransportLayer::Udp(datagram) => {
                        names.push("udp");
                        if datagram.dns.is_some() {
                            names.push("dns");
                        }
                    }
                    TransportLayer::Unrecognized { .. } | TransportLayer::Failed(_) => {}
                }
            }
            NetworkLayer::Unrecognized { .. } | NetworkLayer::Failed(_) => {}
        }
        names
    }

    /// The innermost payload carried by the tree, if any.
    pub fn innermost_payload(&self) -> Option<&PayloadView> {
        match &self.network {
            NetworkLayer::Arp(_) => None,
            NetworkLayer::Unrecognized { payload, .. } => Some(payload),
            NetworkLayer::Failed(failure) => Some(&failure.payload),
            NetworkLayer::Ipv4(packet) => match &packet.transport {
                TransportLayer::Icmp(message) => message.data.as_ref(),
                TransportLayer::Tcp(segment) => segment.payload.as_ref(),
                TransportLayer::Udp(datagram) => datagram.payload.as_ref(),
                TransportLayer::Unrecognized { payload, .. } => Some(payload),
                TransportLayer::Failed(failure) => Some(&failure.payload),
            },
        }
    }
}
