//! Field encoders
//!
//! Each channel maps a covert symbol (or an index, or nothing at all) onto a
//! concrete header field value. Channels hold no state. Arguments outside a
//! channel's domain are rejected with `InvalidEncodingInput`; nothing is
//! clamped or wrapped.

use crate::random::RandomSource;
use covgen_core::{Bit, Error, Result};

/// TTL written for a `0` bit
pub const TTL_ZERO: u8 = 120;
/// TTL written for a `1` bit
pub const TTL_ONE: u8 = 121;

/// Source port standing for `0`
pub const PORT_ZERO: u16 = 4321;
/// Source port standing for `1`
pub const PORT_ONE: u16 = 4322;

/// Payload length standing for `0`
pub const PAYLOAD_ZERO_LEN: usize = 100;
/// Payload length standing for `1`
pub const PAYLOAD_ONE_LEN: usize = 200;

fn bit(channel: &'static str, value: u8) -> Result<Bit> {
    Bit::try_from(value)
        .map_err(|_| Error::invalid_input(channel, format!("bit {} is not 0 or 1", value)))
}

/// TTL parity: `0` → 120, `1` → 121
pub fn ttl_parity(value: u8) -> Result<u8> {
    Ok(match bit("ttl-parity", value)? {
        Bit::Zero => TTL_ZERO,
        Bit::One => TTL_ONE,
    })
}

/// Fixed-value channel, the input carries no information
pub fn fixed<T: Copy>(value: T) -> T {
    value
}

/// `base + index`, for fields that must climb by exactly one per packet
pub fn incremental_index(base: u16, index: usize) -> Result<u16> {
    u16::try_from(index)
        .ok()
        .and_then(|i| base.checked_add(i))
        .ok_or_else(|| {
            Error::invalid_input(
                "incremental-index",
                format!("{} + {} does not fit in 16 bits", base, index),
            )
        })
}

fn check_bounds<T: PartialOrd + std::fmt::Display>(low: T, high: T) -> Result<()> {
    if low > high {
        return Err(Error::invalid_input(
            "bounded-random",
            format!("low bound {} is above high bound {}", low, high),
        ));
    }
    Ok(())
}

/// Uniform 32-bit value in `[low, high]`
pub fn bounded_random_u32(rng: &mut dyn RandomSource, low: u32, high: u32) -> Result<u32> {
    check_bounds(low, high)?;
    Ok(rng.range_u32(low, high))
}

/// Uniform 16-bit value in `[low, high]`
pub fn bounded_random_u16(rng: &mut dyn RandomSource, low: u16, high: u16) -> Result<u16> {
    check_bounds(low, high)?;
    let value = rng.range_u32(low as u32, high as u32);
    u16::try_from(value).map_err(|_| {
        Error::invalid_input(
            "bounded-random",
            format!("random source returned {} outside [{}, {}]", value, low, high),
        )
    })
}

/// Source port for a symbol; an unpinned symbol is drawn with a fair coin
pub fn port_choice(symbol: Option<u8>, rng: &mut dyn RandomSource) -> Result<u16> {
    let symbol = match symbol {
        Some(value) => bit("port-choice", value)?,
        None => Bit::from(rng.coin()),
    };

    Ok(match symbol {
        Bit::Zero => PORT_ZERO,
        Bit::One => PORT_ONE,
    })
}

/// Zero-filled payload of 100 bytes for `0` or 200 bytes for `1`
pub fn payload_length(value: u8) -> Result<Vec<u8>> {
    let len = match bit("payload-length", value)? {
        Bit::Zero => PAYLOAD_ZERO_LEN,
        Bit::One => PAYLOAD_ONE_LEN,
    };
    Ok(vec![0u8; len])
}
