//! The closed set of fixture patterns

use std::fmt;
use std::str::FromStr;

use crate::generators;
use crate::random::RandomSource;
use covgen_core::{parse_bits, Error, PacketDescriptor, Result};
use tracing::debug;

/// Bits carried by `binary_ttl`
pub const BINARY_TTL_BITS: &str = "01101001";

/// Bits carried by `variable_size`
pub const VARIABLE_SIZE_BITS: &str = "10110";

/// One named covert-channel pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    FixedTtlSeq,
    FixedSeq,
    IncrementalIds,
    BinaryTtl,
    RepeatingPorts,
    VariableSize,
}

impl Pattern {
    /// Every pattern, in run order
    pub const ALL: [Pattern; 6] = [
        Pattern::FixedTtlSeq,
        Pattern::FixedSeq,
        Pattern::IncrementalIds,
        Pattern::BinaryTtl,
        Pattern::RepeatingPorts,
        Pattern::VariableSize,
    ];

    /// Label used in artifact file names
    pub fn label(self) -> &'static str {
        match self {
            Pattern::FixedTtlSeq => "fixed_ttl_seq",
            Pattern::FixedSeq => "fixed_seq",
            Pattern::IncrementalIds => "incremental_ids",
            Pattern::BinaryTtl => "binary_ttl",
            Pattern::RepeatingPorts => "repeating_ports",
            Pattern::VariableSize => "variable_size",
        }
    }

    /// Text written to the companion description file
    pub fn description(self) -> &'static str {
        match self {
            Pattern::FixedTtlSeq => "Fixed TTL and SEQ with incremental IP ID.",
            Pattern::FixedSeq => "Varied IP ID with fixed TCP SEQ.",
            Pattern::IncrementalIds => "Incrementing IP IDs to simulate timing channels.",
            Pattern::BinaryTtl => "TTL field encodes binary data via even/odd.",
            Pattern::RepeatingPorts => "Source ports 4321/4322 repeat to encode bits.",
            Pattern::VariableSize => "Payload size encodes bits with large/small packets.",
        }
    }

    /// Number of packets the pattern produces
    pub fn packet_count(self) -> usize {
        match self {
            Pattern::FixedTtlSeq | Pattern::FixedSeq | Pattern::IncrementalIds => 10,
            Pattern::BinaryTtl => BINARY_TTL_BITS.len(),
            Pattern::RepeatingPorts => 5,
            Pattern::VariableSize => VARIABLE_SIZE_BITS.len(),
        }
    }

    /// Bit literal encoded by the pattern, if it encodes one
    pub fn literal(self) -> Option<&'static str> {
        match self {
            Pattern::BinaryTtl => Some(BINARY_TTL_BITS),
            Pattern::VariableSize => Some(VARIABLE_SIZE_BITS),
            _ => None,
        }
    }

    /// Generate the pattern's packet sequence
    pub fn generate(self, rng: &mut dyn RandomSource) -> Result<Vec<PacketDescriptor>> {
        let count = self.packet_count();
        let packets = match self {
            Pattern::FixedTtlSeq => generators::fixed_ttl_seq(count)?,
            Pattern::FixedSeq => generators::fixed_seq(count, rng)?,
            Pattern::IncrementalIds => generators::incremental_ids(count, rng)?,
            Pattern::BinaryTtl => generators::binary_ttl(&parse_bits(BINARY_TTL_BITS)?, rng)?,
            Pattern::RepeatingPorts => generators::repeating_ports(count, rng)?,
            Pattern::VariableSize => {
                generators::variable_size(&parse_bits(VARIABLE_SIZE_BITS)?, rng)?
            }
        };

        if packets.len() != count {
            return Err(Error::PacketConstruction(format!(
                "{} produced {} packets, expected {}",
                self.label(),
                packets.len(),
                count
            )));
        }

        debug!(label = self.label(), packets = packets.len(), "Generated pattern");
        Ok(packets)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Pattern::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| Error::UnknownPattern(s.to_string()))
    }
}
