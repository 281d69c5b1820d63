//! IPv4 packet construction and parsing
//!
//! Two IPv4 header fields carry covert data in the generated fixtures: the
//! TTL and the identification field. Both are written verbatim; the header
//! checksum is recomputed on every serialization.

use crate::checksum::internet_checksum;
use bytes::{BufMut, BytesMut};
use std::net::Ipv4Addr;

/// IP protocol numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProtocol {
    /// TCP (6)
    TCP,
    /// Any other protocol number
    Other(u8),
}

impl IpProtocol {
    pub fn to_u8(self) -> u8 {
        match self {
            IpProtocol::TCP => 6,
            IpProtocol::Other(val) => val,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            6 => IpProtocol::TCP,
            val => IpProtocol::Other(val),
        }
    }
}

/// IP Flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IpFlags {
    /// Reserved bit (must be 0)
    pub reserved: bool,
    /// Don't Fragment flag
    pub dont_fragment: bool,
    /// More Fragments flag
    pub more_fragments: bool,
}

impl IpFlags {
    /// No flags set
    pub const NONE: IpFlags = IpFlags {
        reserved: false,
        dont_fragment: false,
        more_fragments: false,
    };

    /// Convert to 3-bit value
    pub fn to_u8(self) -> u8 {
        let mut flags = 0u8;
        if self.reserved {
            flags |= 0b100;
        }
        if self.dont_fragment {
            flags |= 0b010;
        }
        if self.more_fragments {
            flags |= 0b001;
        }
        flags
    }

    /// Parse from 3-bit value
    pub fn from_u8(value: u8) -> Self {
        IpFlags {
            reserved: (value & 0b100) != 0,
            dont_fragment: (value & 0b010) != 0,
            more_fragments: (value & 0b001) != 0,
        }
    }
}

/// IPv4 packet without options
#[derive(Debug, Clone)]
pub struct Ipv4Packet {
    /// Type of Service / DSCP byte
    pub tos: u8,
    /// Total length (header + data) in bytes
    pub total_length: u16,
    pub identification: u16,
    pub flags: IpFlags,
    /// Fragment offset (in 8-byte blocks)
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: IpProtocol,
    /// Header checksum as last computed or parsed
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub payload: Vec<u8>,
}

impl Ipv4Packet {
    /// IPv4 header size; options are never emitted
    pub const HEADER_SIZE: usize = 20;

    /// Maximum IPv4 packet size
    pub const MAX_PACKET_SIZE: usize = 65535;

    /// Create a new IPv4 packet with TTL 64, ID 0 and no flags
    pub fn new(
        source: Ipv4Addr,
        destination: Ipv4Addr,
        protocol: IpProtocol,
        payload: Vec<u8>,
    ) -> Self {
        Ipv4Packet {
            tos: 0,
            total_length: (Self::HEADER_SIZE + payload.len()) as u16,
            identification: 0,
            flags: IpFlags::NONE,
            fragment_offset: 0,
            ttl: 64,
            protocol,
            checksum: 0,
            source,
            destination,
            payload,
        }
    }

    pub fn with_ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_identification(mut self, id: u16) -> Self {
        self.identification = id;
        self
    }

    /// Calculate and update the header checksum
    pub fn calculate_checksum(&mut self) {
        self.checksum = 0;
        self.checksum = internet_checksum(&self.header_bytes());
    }

    fn header_bytes(&self) -> BytesMut {
        let mut buffer = BytesMut::with_capacity(Self::HEADER_SIZE);

        // Version 4, IHL 5
        buffer.put_u8(0x45);
        buffer.put_u8(self.tos);
        buffer.put_u16(self.total_length);
        buffer.put_u16(self.identification);
        buffer.put_u16(((self.flags.to_u8() as u16) << 13) | (self.fragment_offset & 0x1FFF));
        buffer.put_u8(self.ttl);
        buffer.put_u8(self.protocol.to_u8());
        buffer.put_u16(self.checksum);
        buffer.put_slice(&self.source.octets());
        buffer.put_slice(&self.destination.octets());

        buffer
    }

    /// Serialize with a freshly computed header checksum
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut packet = self.clone();
        packet.calculate_checksum();

        let mut buffer = packet.header_bytes();
        buffer.put_slice(&packet.payload);
        buffer.to_vec()
    }

    /// Parse an IPv4 packet
    ///
    /// Bytes past `total_length` (Ethernet padding) are dropped. Packets
    /// carrying options keep them out of the payload.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < Self::HEADER_SIZE {
            return None;
        }

        if data[0] >> 4 != 4 {
            return None;
        }

        let header_len = ((data[0] & 0x0F) as usize) * 4;
        let total_length = u16::from_be_bytes([data[2], data[3]]);
        let end = total_length as usize;
        if header_len < Self::HEADER_SIZE || end < header_len || data.len() < end {
            return None;
        }

        let flags_and_offset = u16::from_be_bytes([data[6], data[7]]);

        Some(Ipv4Packet {
            tos: data[1],
            total_length,
            identification: u16::from_be_bytes([data[4], data[5]]),
            flags: IpFlags::from_u8((flags_and_offset >> 13) as u8),
            fragment_offset: flags_and_offset & 0x1FFF,
            ttl: data[8],
            protocol: IpProtocol::from_u8(data[9]),
            checksum: u16::from_be_bytes([data[10], data[11]]),
            source: Ipv4Addr::new(data[12], data[13], data[14], data[15]),
            destination: Ipv4Addr::new(data[16], data[17], data[18], data[19]),
            payload: data[header_len..end].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::validate_checksum;

    fn sample() -> Ipv4Packet {
        Ipv4Packet::new(
            Ipv4Addr::new(192, 168, 1, 100),
            Ipv4Addr::new(192, 168, 1, 195),
            IpProtocol::TCP,
            vec![0x01, 0x02, 0x03, 0x04],
        )
    }

    #[test]
    fn test_ip_protocol_conversion() {
        assert_eq!(IpProtocol::TCP.to_u8(), 6);
        assert_eq!(IpProtocol::from_u8(6), IpProtocol::TCP);
        assert_eq!(IpProtocol::from_u8(17), IpProtocol::Other(17));
    }

    #[test]
    fn test_ip_flags() {
        assert_eq!(IpFlags::NONE.to_u8(), 0);
        assert_eq!(IpFlags::from_u8(0b010).to_u8(), 0b010);
        assert!(IpFlags::from_u8(0b010).dont_fragment);
        assert_eq!(IpFlags::default(), IpFlags::NONE);
    }

    #[test]
    fn test_ipv4_packet_to_bytes() {
        let bytes = sample().with_ttl(121).with_identification(40001).to_bytes();

        assert_eq!(bytes.len(), 24);
        assert_eq!(bytes[0], 0x45);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), 24);
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 40001);
        assert_eq!(bytes[8], 121);
        assert_eq!(bytes[9], 6);
        assert_eq!(&bytes[12..16], &[192, 168, 1, 100]);
        assert_eq!(&bytes[16..20], &[192, 168, 1, 195]);
        assert_eq!(&bytes[20..24], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_ipv4_header_checksum_valid() {
        let bytes = sample().with_ttl(123).to_bytes();
        assert!(validate_checksum(&bytes[..Ipv4Packet::HEADER_SIZE]));
    }

    #[test]
    fn test_ipv4_packet_roundtrip() {
        let packet1 = sample().with_ttl(120).with_identification(0xBEEF);
        let packet2 = Ipv4Packet::from_bytes(&packet1.to_bytes()).unwrap();

        assert_eq!(packet2.ttl, 120);
        assert_eq!(packet2.identification, 0xBEEF);
        assert_eq!(packet2.source, packet1.source);
        assert_eq!(packet2.destination, packet1.destination);
        assert_eq!(packet2.protocol, IpProtocol::TCP);
        assert_eq!(packet2.payload, packet1.payload);
    }

    #[test]
    fn test_ipv4_from_bytes_trims_padding() {
        let mut bytes = sample().to_bytes();
        bytes.extend_from_slice(&[0u8; 6]);

        let packet = Ipv4Packet::from_bytes(&bytes).unwrap();
        assert_eq!(packet.payload, vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_ipv4_from_bytes_rejects_truncated() {
        let bytes = sample().to_bytes();
        assert!(Ipv4Packet::from_bytes(&bytes[..22]).is_none());
        assert!(Ipv4Packet::from_bytes(&bytes[..10]).is_none());

        let mut not_v4 = bytes.clone();
        not_v4[0] = 0x65;
        assert!(Ipv4Packet::from_bytes(&not_v4).is_none());
    }
}
