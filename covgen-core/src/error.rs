//! Error types for covgen

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for covgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for covgen
#[derive(Error, Debug)]
pub enum Error {
    /// A field encoder was handed an argument outside its domain
    #[error("Invalid input for {channel} channel: {reason}")]
    InvalidEncodingInput {
        channel: &'static str,
        reason: String,
    },

    /// Writing an artifact for a pattern failed
    #[error("Failed to persist '{label}' to {}: {source}", path.display())]
    Persistence {
        label: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error not tied to a specific artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Packet construction error
    #[error("Packet construction error: {0}")]
    PacketConstruction(String),

    /// Packet parsing error
    #[error("Packet parsing error: {0}")]
    PacketParsing(String),

    /// No pattern is registered under this label
    #[error("Unknown pattern '{0}'")]
    UnknownPattern(String),
}

impl Error {
    /// Create an invalid encoding input error
    pub fn invalid_input<S: Into<String>>(channel: &'static str, reason: S) -> Self {
        Error::InvalidEncodingInput {
            channel,
            reason: reason.into(),
        }
    }

    /// Create a persistence error for the artifact at `path`
    pub fn persistence<L, P>(label: L, path: P, source: std::io::Error) -> Self
    where
        L: Into<String>,
        P: Into<PathBuf>,
    {
        Error::Persistence {
            label: label.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a packet parsing error
    pub fn parsing<S: Into<String>>(msg: S) -> Self {
        Error::PacketParsing(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidEncodingInput { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_invalid_input_display() {
        let err = Error::invalid_input("ttl-parity", "bit 2 is not 0 or 1");
        assert!(err.is_invalid_input());
        assert!(!err.is_persistence());
        assert_eq!(
            err.to_string(),
            "Invalid input for ttl-parity channel: bit 2 is not 0 or 1"
        );
    }

    #[test]
    fn test_persistence_carries_label_and_path() {
        let err = Error::persistence(
            "binary_ttl",
            "/nonexistent/covert_binary_ttl.pcap",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_persistence());
        let msg = err.to_string();
        assert!(msg.contains("binary_ttl"));
        assert!(msg.contains("/nonexistent/covert_binary_ttl.pcap"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_io_from() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
