//! Packet builder for constructing fixture frames with a fluent API
//!
//! This module layers Ethernet, IPv4 and TCP around a payload and fills in
//! lengths and checksums.

use crate::ethernet::{EtherType, EthernetFrame, MacAddress};
use crate::ip::{IpProtocol, Ipv4Packet};
use crate::tcp::{TcpFlags, TcpPort, TcpSegment};
use covgen_core::{Error, Result};
use std::net::Ipv4Addr;

/// Layer 2 frame type
#[derive(Debug, Clone)]
enum Layer2 {
    Ethernet {
        src: MacAddress,
        dst: MacAddress,
        ethertype: EtherType,
    },
}

/// Layer 3 packet type
#[derive(Debug, Clone)]
enum Layer3 {
    Ipv4 {
        src: Ipv4Addr,
        dst: Ipv4Addr,
        ttl: u8,
        identification: u16,
    },
}

/// Layer 4 segment type
#[derive(Debug, Clone, Copy)]
enum Layer4 {
    Tcp {
        src_port: u16,
        dst_port: u16,
        seq: u32,
        ack: u32,
        flags: TcpFlags,
        window: u16,
    },
}

/// Packet builder with fluent API
///
/// # Examples
///
/// ```
/// use std::net::Ipv4Addr;
/// use covgen_packet::PacketBuilder;
/// use covgen_packet::ethernet::{EtherType, MacAddress};
/// use covgen_packet::tcp::TcpFlags;
///
/// let frame = PacketBuilder::new()
///     .ethernet(MacAddress([0x02, 0, 0, 0, 0, 1]), MacAddress([0x02, 0, 0, 0, 0, 2]), EtherType::IPv4)
///     .ipv4(Ipv4Addr::new(192, 168, 1, 100), Ipv4Addr::new(192, 168, 1, 195))
///     .ttl(121)
///     .identification(40000)
///     .tcp(1234, 80, 999999, 0, TcpFlags::SYN)
///     .build()
///     .unwrap();
///
/// assert_eq!(frame.len(), 60);
/// ```
pub struct PacketBuilder {
    layer2: Option<Layer2>,
    layer3: Option<Layer3>,
    layer4: Option<Layer4>,
    payload: Vec<u8>,
}

impl PacketBuilder {
    pub fn new() -> Self {
        PacketBuilder {
            layer2: None,
            layer3: None,
            layer4: None,
            payload: Vec::new(),
        }
    }

    /// Add an Ethernet layer
    pub fn ethernet(mut self, src: MacAddress, dst: MacAddress, ethertype: EtherType) -> Self {
        self.layer2 = Some(Layer2::Ethernet {
            src,
            dst,
            ethertype,
        });
        self
    }

    /// Add an IPv4 layer with TTL 64, ID 0 and no flags set
    pub fn ipv4(mut self, src: Ipv4Addr, dst: Ipv4Addr) -> Self {
        self.layer3 = Some(Layer3::Ipv4 {
            src,
            dst,
            ttl: 64,
            identification: 0,
        });
        self
    }

    /// Set the TTL for the IPv4 layer
    ///
    /// Must be called after `ipv4()`.
    pub fn ttl(mut self, new_ttl: u8) -> Self {
        if let Some(Layer3::Ipv4 { ref mut ttl, .. }) = self.layer3 {
            *ttl = new_ttl;
        }
        self
    }

    /// Set the identification for the IPv4 layer
    ///
    /// Must be called after `ipv4()`.
    pub fn identification(mut self, id: u16) -> Self {
        if let Some(Layer3::Ipv4 {
            ref mut identification,
            ..
        }) = self.layer3
        {
            *identification = id;
        }
        self
    }

    /// Add a TCP layer with a 65535 byte window
    pub fn tcp(mut self, src_port: u16, dst_port: u16, seq: u32, ack: u32, flags: TcpFlags) -> Self {
        self.layer4 = Some(Layer4::Tcp {
            src_port,
            dst_port,
            seq,
            ack,
            flags,
            window: 65535,
        });
        self
    }

    /// Set the TCP window size
    ///
    /// Must be called after `tcp()`.
    pub fn window(mut self, new_window: u16) -> Self {
        if let Some(Layer4::Tcp { ref mut window, .. }) = self.layer4 {
            *window = new_window;
        }
        self
    }

    /// Set the payload data
    pub fn payload(mut self, data: Vec<u8>) -> Self {
        self.payload = data;
        self
    }

    /// Build the complete frame
    ///
    /// # Errors
    ///
    /// Returns `PacketConstruction` if a layer is missing beneath a configured
    /// one, or if the IPv4 packet would exceed 65535 bytes.
    pub fn build(self) -> Result<Vec<u8>> {
        let mut packet_data = self.payload;

        if let Some(Layer4::Tcp {
            src_port,
            dst_port,
            seq,
            ack,
            flags,
            window,
        }) = self.layer4
        {
            let Some(Layer3::Ipv4 { src, dst, .. }) = self.layer3 else {
                return Err(Error::PacketConstruction("Layer 4 requires Layer 3".into()));
            };

            let tcp = TcpSegment::new(
                TcpPort::new(src_port),
                TcpPort::new(dst_port),
                seq,
                ack,
                flags,
                window,
                packet_data,
            );
            packet_data = tcp.to_bytes_with_checksum(src, dst);
        }

        if let Some(Layer3::Ipv4 {
            src,
            dst,
            ttl,
            identification,
        }) = self.layer3
        {
            if Ipv4Packet::HEADER_SIZE + packet_data.len() > Ipv4Packet::MAX_PACKET_SIZE {
                return Err(Error::PacketConstruction(format!(
                    "IPv4 packet of {} bytes exceeds {}",
                    Ipv4Packet::HEADER_SIZE + packet_data.len(),
                    Ipv4Packet::MAX_PACKET_SIZE
                )));
            }

            let protocol = match self.layer4 {
                Some(Layer4::Tcp { .. }) => IpProtocol::TCP,
                None => IpProtocol::Other(0),
            };

            packet_data = Ipv4Packet::new(src, dst, protocol, packet_data)
                .with_ttl(ttl)
                .with_identification(identification)
                .to_bytes();
        }

        let Some(Layer2::Ethernet {
            src,
            dst,
            ethertype,
        }) = self.layer2
        else {
            return Err(Error::PacketConstruction("Layer 2 is required".into()));
        };

        Ok(EthernetFrame::new(dst, src, ethertype, packet_data).to_bytes())
    }
}

impl Default for PacketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::validate_checksum;
    use crate::ip::IpFlags;

    const SRC_MAC: MacAddress = MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    const DST_MAC: MacAddress = MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x02]);

    fn addrs() -> (Ipv4Addr, Ipv4Addr) {
        (Ipv4Addr::new(192, 168, 1, 100), Ipv4Addr::new(192, 168, 1, 195))
    }

    #[test]
    fn test_builder_ethernet_ip_tcp() {
        let (src_ip, dst_ip) = addrs();

        let packet = PacketBuilder::new()
            .ethernet(SRC_MAC, DST_MAC, EtherType::IPv4)
            .ipv4(src_ip, dst_ip)
            .ttl(123)
            .identification(40003)
            .tcp(1234, 80, 999999, 0, TcpFlags::SYN)
            .window(8192)
            .payload(vec![0x01, 0x02, 0x03, 0x04])
            .build()
            .unwrap();

        let frame = EthernetFrame::from_bytes(&packet).unwrap();
        assert_eq!(frame.source, SRC_MAC);
        assert_eq!(frame.destination, DST_MAC);
        assert_eq!(frame.ethertype, EtherType::IPv4);

        let ip = Ipv4Packet::from_bytes(&frame.payload).unwrap();
        assert_eq!(ip.source, src_ip);
        assert_eq!(ip.destination, dst_ip);
        assert_eq!(ip.protocol, IpProtocol::TCP);
        assert_eq!(ip.ttl, 123);
        assert_eq!(ip.identification, 40003);
        assert_eq!(ip.flags, IpFlags::NONE);

        let tcp = TcpSegment::from_bytes(&ip.payload).unwrap();
        assert_eq!(tcp.source_port.0, 1234);
        assert_eq!(tcp.destination_port.0, 80);
        assert_eq!(tcp.sequence_number, 999999);
        assert_eq!(tcp.window_size, 8192);
        assert!(tcp.flags.syn);
        assert_eq!(tcp.payload, vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_builder_short_frame_is_padded_but_payload_exact() {
        let (src_ip, dst_ip) = addrs();

        let packet = PacketBuilder::new()
            .ethernet(SRC_MAC, DST_MAC, EtherType::IPv4)
            .ipv4(src_ip, dst_ip)
            .tcp(1234, 80, 0, 0, TcpFlags::SYN)
            .build()
            .unwrap();

        assert_eq!(packet.len(), EthernetFrame::MIN_FRAME_SIZE);

        let frame = EthernetFrame::from_bytes(&packet).unwrap();
        let ip = Ipv4Packet::from_bytes(&frame.payload).unwrap();
        let tcp = TcpSegment::from_bytes(&ip.payload).unwrap();
        assert!(tcp.payload.is_empty());
    }

    #[test]
    fn test_builder_checksums_valid() {
        let (src_ip, dst_ip) = addrs();

        let packet = PacketBuilder::new()
            .ethernet(SRC_MAC, DST_MAC, EtherType::IPv4)
            .ipv4(src_ip, dst_ip)
            .tcp(4322, 80, 7000, 0, TcpFlags::SYN)
            .payload(vec![0u8; 100])
            .build()
            .unwrap();

        let ip_bytes = &packet[EthernetFrame::HEADER_SIZE..];
        assert!(validate_checksum(&ip_bytes[..Ipv4Packet::HEADER_SIZE]));
    }

    #[test]
    fn test_builder_missing_layer2() {
        let result = PacketBuilder::new().payload(vec![0x01, 0x02]).build();
        assert!(matches!(result, Err(Error::PacketConstruction(_))));
    }

    #[test]
    fn test_builder_layer4_without_layer3() {
        let result = PacketBuilder::new()
            .ethernet(SRC_MAC, DST_MAC, EtherType::IPv4)
            .tcp(1234, 80, 0, 0, TcpFlags::SYN)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_oversized_payload() {
        let (src_ip, dst_ip) = addrs();

        let result = PacketBuilder::new()
            .ethernet(SRC_MAC, DST_MAC, EtherType::IPv4)
            .ipv4(src_ip, dst_ip)
            .tcp(1234, 80, 0, 0, TcpFlags::SYN)
            .payload(vec![0u8; 65535])
            .build();

        assert!(matches!(result, Err(Error::PacketConstruction(_))));
    }
}
