//! TCP segment construction and parsing
//!
//! The source port and the sequence number are covert carriers in several
//! fixture patterns, so both round-trip exactly through
//! [`TcpSegment::to_bytes_with_checksum`] and [`TcpSegment::from_bytes`].

use crate::checksum::transport_checksum;
use crate::ip::IpProtocol;
use bytes::{BufMut, BytesMut};
use std::net::Ipv4Addr;

/// TCP port number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpPort(pub u16);

impl TcpPort {
    pub fn new(port: u16) -> Self {
        TcpPort(port)
    }

    pub fn to_u16(self) -> u16 {
        self.0
    }
}

/// TCP flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcpFlags {
    pub fin: bool,
    pub syn: bool,
    pub rst: bool,
    pub psh: bool,
    pub ack: bool,
    pub urg: bool,
    pub ece: bool,
    pub cwr: bool,
}

impl TcpFlags {
    /// No flags set
    pub const NONE: TcpFlags = TcpFlags {
        fin: false,
        syn: false,
        rst: false,
        psh: false,
        ack: false,
        urg: false,
        ece: false,
        cwr: false,
    };

    /// SYN flag (connection initiation)
    pub const SYN: TcpFlags = TcpFlags {
        syn: true,
        ..TcpFlags::NONE
    };

    pub fn to_u8(self) -> u8 {
        let mut flags = 0u8;
        if self.fin {
            flags |= 0b00000001;
        }
        if self.syn {
            flags |= 0b00000010;
        }
        if self.rst {
            flags |= 0b00000100;
        }
        if self.psh {
            flags |= 0b00001000;
        }
        if self.ack {
            flags |= 0b00010000;
        }
        if self.urg {
            flags |= 0b00100000;
        }
        if self.ece {
            flags |= 0b01000000;
        }
        if self.cwr {
            flags |= 0b10000000;
        }
        flags
    }

    pub fn from_u8(value: u8) -> Self {
        TcpFlags {
            fin: (value & 0b00000001) != 0,
            syn: (value & 0b00000010) != 0,
            rst: (value & 0b00000100) != 0,
            psh: (value & 0b00001000) != 0,
            ack: (value & 0b00010000) != 0,
            urg: (value & 0b00100000) != 0,
            ece: (value & 0b01000000) != 0,
            cwr: (value & 0b10000000) != 0,
        }
    }
}

/// TCP segment
#[derive(Debug, Clone)]
pub struct TcpSegment {
    pub source_port: TcpPort,
    pub destination_port: TcpPort,
    pub sequence_number: u32,
    pub acknowledgment_number: u32,
    /// Data offset in 32-bit words (minimum 5)
    pub data_offset: u8,
    pub flags: TcpFlags,
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
    /// Raw options, present when data_offset > 5
    pub options: Vec<u8>,
    pub payload: Vec<u8>,
}

impl TcpSegment {
    /// Minimum TCP header size (without options)
    pub const MIN_HEADER_SIZE: usize = 20;

    pub fn new(
        source_port: TcpPort,
        destination_port: TcpPort,
        sequence_number: u32,
        acknowledgment_number: u32,
        flags: TcpFlags,
        window_size: u16,
        payload: Vec<u8>,
    ) -> Self {
        TcpSegment {
            source_port,
            destination_port,
            sequence_number,
            acknowledgment_number,
            data_offset: 5,
            flags,
            window_size,
            checksum: 0,
            urgent_pointer: 0,
            options: Vec::new(),
            payload,
        }
    }

    /// Calculate and set the checksum over the IPv4 pseudo-header
    pub fn calculate_checksum(&mut self, src_ip: Ipv4Addr, dst_ip: Ipv4Addr) {
        self.checksum = 0;
        let data = self.to_bytes();
        self.checksum = transport_checksum(
            &src_ip.octets(),
            &dst_ip.octets(),
            IpProtocol::TCP.to_u8(),
            &data,
        );
    }

    /// Serialize with whatever checksum is currently set
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer =
            BytesMut::with_capacity(Self::MIN_HEADER_SIZE + self.options.len() + self.payload.len());

        buffer.put_u16(self.source_port.to_u16());
        buffer.put_u16(self.destination_port.to_u16());
        buffer.put_u32(self.sequence_number);
        buffer.put_u32(self.acknowledgment_number);
        buffer.put_u8(self.data_offset << 4);
        buffer.put_u8(self.flags.to_u8());
        buffer.put_u16(self.window_size);
        buffer.put_u16(self.checksum);
        buffer.put_u16(self.urgent_pointer);
        buffer.put_slice(&self.options);
        buffer.put_slice(&self.payload);

        buffer.to_vec()
    }

    /// Serialize with a freshly computed checksum
    pub fn to_bytes_with_checksum(&self, src_ip: Ipv4Addr, dst_ip: Ipv4Addr) -> Vec<u8> {
        let mut segment = self.clone();
        segment.calculate_checksum(src_ip, dst_ip);
        segment.to_bytes()
    }

    /// Parse a TCP segment; `data` must end where the IPv4 payload ends
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < Self::MIN_HEADER_SIZE {
            return None;
        }

        let data_offset = data[12] >> 4;
        let header_len = (data_offset as usize) * 4;
        if header_len < Self::MIN_HEADER_SIZE || data.len() < header_len {
            return None;
        }

        Some(TcpSegment {
            source_port: TcpPort::new(u16::from_be_bytes([data[0], data[1]])),
            destination_port: TcpPort::new(u16::from_be_bytes([data[2], data[3]])),
            sequence_number: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            acknowledgment_number: u32::from_be_bytes([data[8], data[9], data[10], data[11]]),
            data_offset,
            flags: TcpFlags::from_u8(data[13]),
            window_size: u16::from_be_bytes([data[14], data[15]]),
            checksum: u16::from_be_bytes([data[16], data[17]]),
            urgent_pointer: u16::from_be_bytes([data[18], data[19]]),
            options: data[Self::MIN_HEADER_SIZE..header_len].to_vec(),
            payload: data[header_len..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syn(seq: u32, payload: Vec<u8>) -> TcpSegment {
        TcpSegment::new(
            TcpPort::new(4321),
            TcpPort::new(80),
            seq,
            0,
            TcpFlags::SYN,
            8192,
            payload,
        )
    }

    #[test]
    fn test_tcp_flags() {
        assert_eq!(TcpFlags::SYN.to_u8(), 0b00000010);
        assert_eq!(TcpFlags::from_u8(0b00000010), TcpFlags::SYN);

        let syn_ack = TcpFlags::from_u8(0b00010010);
        assert!(syn_ack.syn && syn_ack.ack);
        assert_eq!(syn_ack.to_u8(), 0b00010010);
        assert_eq!(TcpFlags::default(), TcpFlags::NONE);
    }

    #[test]
    fn test_tcp_segment_to_bytes() {
        let bytes = syn(999999, vec![0x01, 0x02]).to_bytes();

        assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), 4321);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), 80);
        assert_eq!(
            u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            999999
        );
        assert_eq!(bytes[12] >> 4, 5);
        assert_eq!(bytes[13], TcpFlags::SYN.to_u8());
        assert_eq!(u16::from_be_bytes([bytes[14], bytes[15]]), 8192);
        assert_eq!(&bytes[20..], &[0x01, 0x02]);
    }

    #[test]
    fn test_tcp_segment_checksum_nonzero() {
        let mut segment = syn(888888, vec![]);
        segment.calculate_checksum(Ipv4Addr::new(192, 168, 1, 100), Ipv4Addr::new(192, 168, 1, 195));
        assert_ne!(segment.checksum, 0);
    }

    #[test]
    fn test_tcp_segment_roundtrip_max_sequence() {
        let src_ip = Ipv4Addr::new(192, 168, 1, 100);
        let dst_ip = Ipv4Addr::new(192, 168, 1, 195);
        let segment1 = syn(u32::MAX, vec![0u8; 200]);

        let bytes = segment1.to_bytes_with_checksum(src_ip, dst_ip);
        let segment2 = TcpSegment::from_bytes(&bytes).unwrap();

        assert_eq!(segment2.source_port, segment1.source_port);
        assert_eq!(segment2.destination_port.to_u16(), 80);
        assert_eq!(segment2.sequence_number, u32::MAX);
        assert_eq!(segment2.flags, TcpFlags::SYN);
        assert_eq!(segment2.payload.len(), 200);
    }

    #[test]
    fn test_tcp_segment_from_bytes_bad_offset() {
        let mut bytes = syn(1, vec![]).to_bytes();
        bytes[12] = 0x40; // data offset 4 is below the minimum
        assert!(TcpSegment::from_bytes(&bytes).is_none());

        bytes[12] = 0xF0; // 60 byte header but only 20 bytes present
        assert!(TcpSegment::from_bytes(&bytes).is_none());
    }
}
