//! The six pattern generators
//!
//! Each generator holds every non-covert field at the fixture template
//! (destination 192.168.1.195:80, source port 1234) and drives the covert
//! field(s) through one encoder channel. Noise fields come from the
//! caller's [`RandomSource`].

use crate::encoder::{
    bounded_random_u16, bounded_random_u32, fixed, incremental_index, payload_length,
    port_choice, ttl_parity,
};
use crate::random::RandomSource;
use covgen_core::{template, Bit, PacketDescriptor, Result};
use tracing::trace;

/// TTL 123 and sequence 999999 on every packet, IP ID counting up from 40000
pub fn fixed_ttl_seq(count: usize) -> Result<Vec<PacketDescriptor>> {
    (0..count)
        .map(|i| {
            let pkt = PacketDescriptor::new(
                fixed(123),
                incremental_index(40000, i)?,
                fixed(999999),
            );
            trace!(index = i, ip_id = pkt.ip_identifier, "fixed_ttl_seq packet");
            Ok(pkt)
        })
        .collect()
}

/// Sequence fixed at 888888, IP ID drawn from [10000, 20000]
pub fn fixed_seq(count: usize, rng: &mut dyn RandomSource) -> Result<Vec<PacketDescriptor>> {
    (0..count)
        .map(|i| {
            let pkt = PacketDescriptor::new(
                fixed(template::DEFAULT_TTL),
                bounded_random_u16(rng, 10000, 20000)?,
                fixed(888888),
            );
            trace!(index = i, ip_id = pkt.ip_identifier, "fixed_seq packet");
            Ok(pkt)
        })
        .collect()
}

/// IP ID counting up from 10000, sequence drawn from [1000, 5000]
pub fn incremental_ids(count: usize, rng: &mut dyn RandomSource) -> Result<Vec<PacketDescriptor>> {
    (0..count)
        .map(|i| {
            let pkt = PacketDescriptor::new(
                fixed(template::DEFAULT_TTL),
                incremental_index(10000, i)?,
                bounded_random_u32(rng, 1000, 5000)?,
            );
            trace!(
                index = i,
                ip_id = pkt.ip_identifier,
                seq = pkt.sequence_number,
                "incremental_ids packet"
            );
            Ok(pkt)
        })
        .collect()
}

/// One packet per bit, TTL parity carries the bit
pub fn binary_ttl(bits: &[Bit], rng: &mut dyn RandomSource) -> Result<Vec<PacketDescriptor>> {
    bits.iter()
        .enumerate()
        .map(|(i, bit)| {
            let pkt = PacketDescriptor::new(
                ttl_parity(bit.to_u8())?,
                bounded_random_u16(rng, 10000, 20000)?,
                bounded_random_u32(rng, 2000, 7000)?,
            );
            trace!(
                index = i,
                bit = %bit,
                ttl = pkt.ttl,
                ip_id = pkt.ip_identifier,
                seq = pkt.sequence_number,
                "binary_ttl packet"
            );
            Ok(pkt)
        })
        .collect()
}

/// Source port picked from 4321/4322 by coin flip for every packet
///
/// The port is not tied to a bit literal; each packet's symbol is drawn
/// independently.
pub fn repeating_ports(count: usize, rng: &mut dyn RandomSource) -> Result<Vec<PacketDescriptor>> {
    (0..count)
        .map(|i| {
            let port = port_choice(None, rng)?;
            let pkt = PacketDescriptor::new(
                fixed(template::DEFAULT_TTL),
                bounded_random_u16(rng, 30000, 40000)?,
                bounded_random_u32(rng, 5000, 15000)?,
            )
            .with_source_port(port);
            trace!(
                index = i,
                port,
                ip_id = pkt.ip_identifier,
                seq = pkt.sequence_number,
                "repeating_ports packet"
            );
            Ok(pkt)
        })
        .collect()
}

/// One packet per bit, payload of 100 or 200 zero bytes carries the bit
///
/// The sequence number is left at zero.
pub fn variable_size(bits: &[Bit], rng: &mut dyn RandomSource) -> Result<Vec<PacketDescriptor>> {
    bits.iter()
        .enumerate()
        .map(|(i, bit)| {
            let pkt = PacketDescriptor::new(
                fixed(template::DEFAULT_TTL),
                bounded_random_u16(rng, 3000, 4000)?,
                0,
            )
            .with_payload(payload_length(bit.to_u8())?);
            trace!(
                index = i,
                bit = %bit,
                payload_len = pkt.payload.len(),
                ip_id = pkt.ip_identifier,
                "variable_size packet"
            );
            Ok(pkt)
        })
        .collect()
}
