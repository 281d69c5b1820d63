//! Frame construction and parsing for covgen fixtures
//!
//! This crate builds and parses the Ethernet II / IPv4 / TCP frames that
//! fixture traces are made of:
//!
//! - [`builder`] - High-level fluent API for frame construction
//! - [`ethernet`] - Ethernet II framing with minimum-size padding
//! - [`ip`] - IPv4 header construction with checksum calculation
//! - [`tcp`] - TCP segment construction with pseudo-header checksum
//! - [`checksum`] - Internet checksum (RFC 1071)
//!
//! # Quick Start
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use covgen_packet::{EtherType, EthernetFrame, Ipv4Packet, MacAddress, PacketBuilder, TcpFlags};
//!
//! let bytes = PacketBuilder::new()
//!     .ethernet(MacAddress([0x02, 0, 0, 0, 0, 1]), MacAddress([0x02, 0, 0, 0, 0, 2]), EtherType::IPv4)
//!     .ipv4(Ipv4Addr::new(192, 168, 1, 100), Ipv4Addr::new(192, 168, 1, 195))
//!     .ttl(120)
//!     .tcp(1234, 80, 2000, 0, TcpFlags::SYN)
//!     .build()
//!     .unwrap();
//!
//! let frame = EthernetFrame::from_bytes(&bytes).unwrap();
//! let ip = Ipv4Packet::from_bytes(&frame.payload).unwrap();
//! assert_eq!(ip.ttl, 120);
//! ```

pub mod builder;
pub mod checksum;
pub mod ethernet;
pub mod ip;
pub mod tcp;

// Re-export commonly used types for convenience
pub use builder::PacketBuilder;
pub use checksum::{internet_checksum, transport_checksum, validate_checksum};
pub use ethernet::{EtherType, EthernetFrame, MacAddress};
pub use ip::{IpFlags, IpProtocol, Ipv4Packet};
pub use tcp::{TcpFlags, TcpPort, TcpSegment};
