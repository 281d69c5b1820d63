//! Trace write statistics

use std::fmt;

/// Totals for one written trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceStats {
    /// Number of packet records written
    pub packets: u64,
    /// Total captured frame bytes, record headers excluded
    pub bytes: u64,
}

impl TraceStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one written frame
    pub fn record_packet(&mut self, size: usize) {
        self.packets += 1;
        self.bytes += size as u64;
    }

    /// Mean frame size in bytes
    pub fn average_packet_size(&self) -> f64 {
        if self.packets == 0 {
            return 0.0;
        }
        self.bytes as f64 / self.packets as f64
    }

    /// Format statistics as human-readable string
    pub fn format(&self) -> String {
        format!(
            "{} packets ({} bytes, avg {:.1} bytes)",
            self.packets,
            self.bytes,
            self.average_packet_size()
        )
    }
}

impl fmt::Display for TraceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
