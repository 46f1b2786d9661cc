use tracing::{debug, debug_span, trace};

use super::constants::{ethertype, ip_proto};
use super::context::DecodeConfig;
use super::error::DecodeError;
use super::tree::{
    DecodedPacket, IcmpMessage, Ipv4Packet, LayerFailure, NetworkLayer, TcpSegment,
    TransportLayer, UdpDatagram,
};
use crate::layer::ProtocolProcessor;
use crate::layer::application::{looks_like_http, parse_dns_message};
use crate::layer::datalink::{ArpProcessor, EthernetProcessor};
use crate::layer::network::{IcmpProcessor, Ipv4Processor};
use crate::layer::transport::{TcpProcessor, UdpProcessor};
use crate::packet::PayloadView;

/// Decodes raw Ethernet II frames into a [`DecodedPacket`] tree.
///
/// Decoding is pure: the same bytes and configuration always produce the
/// same tree, and the decoder keeps no state between frames.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    pub config: DecodeConfig,
}

impl Decoder {
    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decodes one frame.
    ///
    /// Fails only when the Ethernet header itself cannot be read. A failure
    /// further in is recorded as a [`LayerFailure`] node and the outer layers
    /// are still returned.
    pub fn decode(&self, raw: &[u8]) -> Result<DecodedPacket, DecodeError> {
        let span = debug_span!("decode", frame_len = raw.len());
        let _guard = span.enter();

        let (ethernet, rest) = EthernetProcessor.parse(raw)?;
        trace!(
            ethertype = ethernet.ethertype,
            source = %ethernet.source,
            destination = %ethernet.destination,
            "ethernet"
        );

        let network = match ethernet.ethertype {
            ethertype::ARP => self.decode_arp(rest),
            ethertype::IPV4 => self.decode_ipv4(rest),
            other => {
                debug!(ethertype = other, "no decoder for ethertype");
                NetworkLayer::Unrecognized {
                    ethertype: other,
                    payload: PayloadView::unclassified(rest),
                }
            }
        };

        Ok(DecodedPacket { ethernet, network })
    }

    fn decode_arp(&self, data: &[u8]) -> NetworkLayer {
        match ArpProcessor.parse(data) {
            Ok((arp, _)) => {
                trace!(operation = %arp.operation, "arp");
                NetworkLayer::Arp(arp)
            }
            Err(error) => NetworkLayer::Failed(failed::<ArpProcessor>(error, data)),
        }
    }

    fn decode_ipv4(&self, data: &[u8]) -> NetworkLayer {
        let (header, payload) = match Ipv4Processor.parse(data) {
            Ok(parsed) => parsed,
            Err(error) => return NetworkLayer::Failed(failed::<Ipv4Processor>(error, data)),
        };
        trace!(
            source = %header.source,
            destination = %header.destination,
            protocol = header.protocol,
            "ipv4"
        );

        let transport = match header.protocol {
            ip_proto::ICMP => self.decode_icmp(payload),
            ip_proto::TCP => self.decode_tcp(payload),
            ip_proto::UDP => self.decode_udp(payload),
            other => {
                debug!(protocol = other, "no decoder for ip protocol");
                TransportLayer::Unrecognized {
                    protocol: other,
                    payload: PayloadView::unclassified(payload),
                }
            }
        };

        NetworkLayer::Ipv4(Ipv4Packet { header, transport })
    }

    fn decode_icmp(&self, data: &[u8]) -> TransportLayer {
        match IcmpProcessor.parse(data) {
            Ok((header, rest)) => TransportLayer::Icmp(IcmpMessage {
                header,
                data: PayloadView::non_empty(rest, &self.config),
            }),
            Err(error) => TransportLayer::Failed(failed::<IcmpProcessor>(error, data)),
        }
    }

    fn decode_tcp(&self, data: &[u8]) -> TransportLayer {
        match TcpProcessor.parse(data) {
            Ok((header, rest)) => {
                let http_hint = looks_like_http(rest, self.config.http_probe_len);
                trace!(flags = ?header.flags.names(), payload_len = rest.len(), "tcp");
                TransportLayer::Tcp(TcpSegment {
                    header,
                    payload: PayloadView::non_empty(rest, &self.config),
                    http_hint,
                })
            }
            Err(error) => TransportLayer::Failed(failed::<TcpProcessor>(error, data)),
        }
    }

    fn decode_udp(&self, data: &[u8]) -> TransportLayer {
        match UdpProcessor.parse(data) {
            Ok((header, rest)) => {
                let body = header.bounded_payload(rest, self.config.udp_length);
                let dns = if header.involves_port(self.config.dns_port) {
                    parse_dns_message(body)
                } else {
                    None
                };
                TransportLayer::Udp(UdpDatagram {
                    header,
                    payload: PayloadView::non_empty(body, &self.config),
                    dns,
                })
            }
            Err(error) => TransportLayer::Failed(failed::<UdpProcessor>(error, data)),
        }
    }
}

fn failed<P: ProtocolProcessor>(error: DecodeError, data: &[u8]) -> LayerFailure {
    debug!(%error, "layer not decoded");
    LayerFailure::new(P::NAME, error, data)
}

/// Decodes `raw` with the default configuration.
pub fn decode(raw: &[u8]) -> Result<DecodedPacket, DecodeError> {
    Decoder::default().decode(raw)
}
