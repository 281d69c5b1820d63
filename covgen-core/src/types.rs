//! Common types used throughout covgen

use std::fmt;

use crate::{Error, Result};

/// A single covert bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    pub fn to_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl TryFrom<u8> for Bit {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            other => Err(Error::invalid_input(
                "bit",
                format!("{} is not 0 or 1", other),
            )),
        }
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u8())
    }
}

/// Parse a literal such as `"01101001"` into bits, most significant first
pub fn parse_bits(literal: &str) -> Result<Vec<Bit>> {
    if literal.is_empty() {
        return Err(Error::invalid_input("bit-literal", "literal is empty"));
    }

    literal
        .chars()
        .map(|c| match c {
            '0' => Ok(Bit::Zero),
            '1' => Ok(Bit::One),
            other => Err(Error::invalid_input(
                "bit-literal",
                format!("'{}' is not a binary digit", other),
            )),
        })
        .collect()
}

/// Fixed header values shared by every fixture packet
pub mod template {
    use std::net::Ipv4Addr;

    /// Destination of every generated packet
    pub const DESTINATION_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 195);

    /// Source address stamped on the IPv4 header
    pub const SOURCE_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 100);

    pub const DESTINATION_PORT: u16 = 80;

    /// Source port used unless a pattern encodes through it
    pub const SOURCE_PORT: u16 = 1234;

    /// Locally administered MACs for the link layer
    pub const SOURCE_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    pub const DESTINATION_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];

    pub const DEFAULT_TTL: u8 = 64;

    pub const TCP_WINDOW: u16 = 8192;
}
