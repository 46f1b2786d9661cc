pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN_8021Q: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
}

pub mod ip_proto {
    pub const ICMP: u8 = 1;
    pub const IGMP: u8 = 2;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
    pub const ICMPV6: u8 = 58;
}

pub mod port {
    pub const DNS: u16 = 53;
}

pub fn ethertype_name(value: u16) -> &'static str {
    match value {
        ethertype::IPV4 => "ipv4",
        ethertype::ARP => "arp",
        ethertype::VLAN_8021Q => "vlan",
        ethertype::IPV6 => "ipv6",
        _ => "unknown",
    }
}

pub fn ip_protocol_name(value: u8) -> &'static str {
    match value {
        ip_proto::ICMP => "icmp",
        ip_proto::IGMP => "igmp",
        ip_proto::TCP => "tcp",
        ip_proto::UDP => "udp",
        ip_proto::ICMPV6 => "icmpv6",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::{ethertype, ethertype_name, ip_proto, ip_protocol_name};

    #[test]
    fn ethertype_names_cover_known_values() {
        assert_eq!(ethertype_name(ethertype::IPV4), "ipv4");
        assert_eq!(ethertype_name(ethertype::ARP), "arp");
        assert_eq!(ethertype_name(0x1234), "unknown");
    }

    #[test]
    fn ip_protocol_names_cover_known_values() {
        assert_eq!(ip_protocol_name(ip_proto::TCP), "tcp");
        assert_eq!(ip_protocol_name(ip_proto::UDP), "udp");
        assert_eq!(ip_protocol_name(250), "unknown");
    }
}
