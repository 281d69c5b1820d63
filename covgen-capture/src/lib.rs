//! Artifact output for covgen
//!
//! This crate persists generated packet sequences as classic pcap traces,
//! alongside a plain-text description per pattern.
//!
//! ## Features
//!
//! - **Trace writing**: Ethernet/IPv4/TCP frames in a libpcap container
//! - **Trace reading**: parse a written trace back into descriptors
//! - **Descriptions**: exact pattern description text, no trailing newline
//! - **Naming**: timestamped file names shared by a pattern's artifacts
//! - **Statistics**: packet and byte totals per trace
//!
//! ## Example
//!
//! ```no_run
//! use covgen_capture::{ArtifactStamp, DescriptionLogger, TraceWriter};
//! use covgen_core::PacketDescriptor;
//!
//! # fn main() -> covgen_core::Result<()> {
//! let stamp = ArtifactStamp::now();
//! let packets = vec![PacketDescriptor::new(120, 10000, 2000)];
//!
//! let (trace, stats) = TraceWriter::new("out").write("demo", &packets, &stamp)?;
//! let description = DescriptionLogger::new("out").write("demo", "A demo trace.", &stamp)?;
//! println!("{} ({}) + {}", trace.display(), stats, description.display());
//! # Ok(())
//! # }
//! ```

pub mod description;
pub mod frame;
pub mod naming;
pub mod stats;
pub mod trace;

// Re-export main types
pub use description::DescriptionLogger;
pub use naming::{description_file_name, trace_file_name, ArtifactStamp};
pub use stats::TraceStats;
pub use trace::{read_records, read_trace, TraceRecord, TraceWriter};
