//! Packet descriptor types

use std::net::Ipv4Addr;

use crate::types::template;

/// In-memory description of one synthetic TCP/IPv4 packet
///
/// Only the fields a covert channel can ride on are kept here. Link-layer
/// addresses, the IPv4 source and the TCP flags come from
/// [`template`](crate::types::template) when the descriptor is framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketDescriptor {
    /// IPv4 destination
    pub destination_address: Ipv4Addr,
    /// Time to live
    pub ttl: u8,
    /// IPv4 identification field
    pub ip_identifier: u16,
    /// TCP source port
    pub source_port: u16,
    /// TCP destination port
    pub destination_port: u16,
    /// TCP sequence number
    pub sequence_number: u32,
    /// TCP payload
    pub payload: Vec<u8>,
}

impl PacketDescriptor {
    /// Create a descriptor from the fixture template with an empty payload
    pub fn new(ttl: u8, ip_identifier: u16, sequence_number: u32) -> Self {
        Self {
            destination_address: template::DESTINATION_ADDRESS,
            ttl,
            ip_identifier,
            source_port: template::SOURCE_PORT,
            destination_port: template::DESTINATION_PORT,
            sequence_number,
            payload: Vec::new(),
        }
    }

    /// Override the TCP source port
    pub fn with_source_port(mut self, port: u16) -> Self {
        self.source_port = port;
        self
    }

    /// Attach a payload
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Get payload length
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_template_defaults() {
        let pkt = PacketDescriptor::new(64, 10000, 42);
        assert_eq!(pkt.destination_address, Ipv4Addr::new(192, 168, 1, 195));
        assert_eq!(pkt.source_port, 1234);
        assert_eq!(pkt.destination_port, 80);
        assert_eq!(pkt.payload_len(), 0);
    }

    #[test]
    fn test_descriptor_builders() {
        let pkt = PacketDescriptor::new(64, 1, 2)
            .with_source_port(4322)
            .with_payload(vec![0; 100]);
        assert_eq!(pkt.source_port, 4322);
        assert_eq!(pkt.payload_len(), 100);
    }
}
