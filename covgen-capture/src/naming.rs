//! Artifact file naming

use chrono::{DateTime, Local};
use std::fmt;

/// strftime layout of the stamp embedded in artifact names
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Generation time shared by the trace and description of one pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactStamp {
    at: DateTime<Local>,
}

impl ArtifactStamp {
    /// Stamp the current local time
    pub fn now() -> Self {
        Self { at: Local::now() }
    }

    pub fn from_datetime(at: DateTime<Local>) -> Self {
        Self { at }
    }

    pub fn datetime(&self) -> DateTime<Local> {
        self.at
    }

    /// Seconds and microseconds since the epoch, as pcap records want them
    pub fn epoch_parts(&self) -> (u32, u32) {
        let secs = u32::try_from(self.at.timestamp()).unwrap_or(0);
        (secs, self.at.timestamp_subsec_micros().min(999_999))
    }
}

impl fmt::Display for ArtifactStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at.format(STAMP_FORMAT))
    }
}

/// `covert_<label>_<stamp>.pcap`
pub fn trace_file_name(label: &str, stamp: &ArtifactStamp) -> String {
    format!("covert_{}_{}.pcap", label, stamp)
}

/// `covert_<label>_description_<stamp>.txt`
pub fn description_file_name(label: &str, stamp: &ArtifactStamp) -> String {
    format!("covert_{}_description_{}.txt", label, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_stamp() -> ArtifactStamp {
        ArtifactStamp::from_datetime(Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap())
    }

    #[test]
    fn test_stamp_format() {
        assert_eq!(fixed_stamp().to_string(), "20240305_140709");
    }

    #[test]
    fn test_file_names() {
        let stamp = fixed_stamp();
        assert_eq!(
            trace_file_name("binary_ttl", &stamp),
            "covert_binary_ttl_20240305_140709.pcap"
        );
        assert_eq!(
            description_file_name("binary_ttl", &stamp),
            "covert_binary_ttl_description_20240305_140709.txt"
        );
    }

    #[test]
    fn test_epoch_parts() {
        let stamp = fixed_stamp();
        let (secs, usecs) = stamp.epoch_parts();
        assert_eq!(secs as i64, stamp.datetime().timestamp());
        assert_eq!(usecs, 0);
    }
}
