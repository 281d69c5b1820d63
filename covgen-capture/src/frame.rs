//! Mapping between packet descriptors and on-wire frames
//!
//! Every descriptor is framed with the fixture template: fixed MACs, source
//! 192.168.1.100, TCP SYN with window 8192 and no IP flags.

use covgen_core::{template, Error, PacketDescriptor, Result};
use covgen_packet::{
    EtherType, EthernetFrame, IpProtocol, Ipv4Packet, MacAddress, PacketBuilder, TcpFlags,
    TcpSegment,
};

/// Build the Ethernet/IPv4/TCP frame for a descriptor
pub fn encode(packet: &PacketDescriptor) -> Result<Vec<u8>> {
    PacketBuilder::new()
        .ethernet(
            MacAddress::new(template::SOURCE_MAC),
            MacAddress::new(template::DESTINATION_MAC),
            EtherType::IPv4,
        )
        .ipv4(template::SOURCE_ADDRESS, packet.destination_address)
        .ttl(packet.ttl)
        .identification(packet.ip_identifier)
        .tcp(
            packet.source_port,
            packet.destination_port,
            packet.sequence_number,
            0,
            TcpFlags::SYN,
        )
        .window(template::TCP_WINDOW)
        .payload(packet.payload.clone())
        .build()
}

/// Recover the descriptor fields from a frame
///
/// Only Ethernet II frames carrying IPv4/TCP are accepted.
pub fn decode(frame: &[u8]) -> Result<PacketDescriptor> {
    let eth = EthernetFrame::from_bytes(frame)
        .ok_or_else(|| Error::parsing(format!("{} byte frame is too short", frame.len())))?;
    if eth.ethertype != EtherType::IPv4 {
        return Err(Error::parsing(format!("unexpected ethertype {}", eth.ethertype)));
    }

    let ip = Ipv4Packet::from_bytes(&eth.payload)
        .ok_or_else(|| Error::parsing("malformed IPv4 header"))?;
    if ip.protocol != IpProtocol::TCP {
        return Err(Error::parsing(format!(
            "unexpected IP protocol {}",
            ip.protocol.to_u8()
        )));
    }

    let tcp = TcpSegment::from_bytes(&ip.payload)
        .ok_or_else(|| Error::parsing("malformed TCP header"))?;

    Ok(PacketDescriptor {
        destination_address: ip.destination,
        ttl: ip.ttl,
        ip_identifier: ip.identification,
        source_port: tcp.source_port.to_u16(),
        destination_port: tcp.destination_port.to_u16(),
        sequence_number: tcp.sequence_number,
        payload: tcp.payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use covgen_packet::{validate_checksum, IpFlags};

    #[test]
    fn test_encode_uses_template() {
        let pkt = PacketDescriptor::new(121, 40001, 999999);
        let bytes = encode(&pkt).unwrap();
        assert_eq!(bytes.len(), EthernetFrame::MIN_FRAME_SIZE);

        let eth = EthernetFrame::from_bytes(&bytes).unwrap();
        assert_eq!(eth.source.0, template::SOURCE_MAC);
        assert_eq!(eth.destination.0, template::DESTINATION_MAC);

        let ip = Ipv4Packet::from_bytes(&eth.payload).unwrap();
        assert_eq!(ip.source, template::SOURCE_ADDRESS);
        assert_eq!(ip.flags, IpFlags::NONE);
        assert!(validate_checksum(&eth.payload[..Ipv4Packet::HEADER_SIZE]));

        let tcp = TcpSegment::from_bytes(&ip.payload).unwrap();
        assert!(tcp.flags.syn);
        assert!(!tcp.flags.ack);
        assert_eq!(tcp.acknowledgment_number, 0);
        assert_eq!(tcp.window_size, 8192);
    }

    #[test]
    fn test_decode_recovers_descriptor() {
        let pkt = PacketDescriptor::new(64, 3500, 0)
            .with_source_port(4322)
            .with_payload(vec![0u8; 200]);
        assert_eq!(decode(&encode(&pkt).unwrap()).unwrap(), pkt);

        // Padded minimum frame must not grow a payload
        let small = PacketDescriptor::new(120, 10000, 2000);
        assert_eq!(decode(&encode(&small).unwrap()).unwrap(), small);
    }

    #[test]
    fn test_decode_rejects_non_tcp() {
        assert!(decode(&[0u8; 10]).is_err());

        let mut bytes = encode(&PacketDescriptor::new(64, 1, 1)).unwrap();
        bytes[12] = 0x08;
        bytes[13] = 0x06;
        assert!(matches!(decode(&bytes), Err(Error::PacketParsing(_))));
    }
}
