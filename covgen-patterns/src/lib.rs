//! Covert-channel encoders and pattern generators
//!
//! This crate turns named covert-channel patterns into ordered sequences of
//! [`PacketDescriptor`](covgen_core::PacketDescriptor)s. Writing those
//! sequences to disk is left to `covgen-capture`.
//!
//! ## Layout
//!
//! ### Encoders
//! Stateless field channels (TTL parity, fixed value, incremental index,
//! bounded random, port choice, payload length).
//! See [`encoder`] module for details.
//!
//! ### Generators
//! One function per pattern, each combining the template with a channel.
//! See [`generators`] module for details.
//!
//! ### Patterns
//! The closed [`Pattern`] set with labels, descriptions and packet counts.
//!
//! ### Randomness
//! [`RandomSource`] is injected into every generator that draws noise.
//!
//! ## Example
//!
//! ```rust
//! use covgen_patterns::{FixedSource, Pattern};
//!
//! let packets = Pattern::BinaryTtl.generate(&mut FixedSource::Low).unwrap();
//! let ttls: Vec<u8> = packets.iter().map(|p| p.ttl).collect();
//! assert_eq!(ttls, [120, 121, 121, 120, 121, 120, 120, 121]);
//! ```

pub mod encoder;
pub mod generators;
pub mod pattern;
pub mod random;


pub use pattern::{Pattern, BINARY_TTL_BITS, VARIABLE_SIZE_BITS};
pub use random::{FixedSource, RandomSource};
