//! Companion description files

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use covgen_core::{Error, Result};
use tracing::info;

use crate::naming::{description_file_name, ArtifactStamp};

/// Writes the plain-text description that accompanies each trace
#[derive(Debug, Clone)]
pub struct DescriptionLogger {
    output_dir: PathBuf,
}

impl DescriptionLogger {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `description` verbatim, without a trailing newline
    pub fn write(&self, label: &str, description: &str, stamp: &ArtifactStamp) -> Result<PathBuf> {
        let path = self.output_dir.join(description_file_name(label, stamp));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::persistence(label, path.clone(), e))?;

        if let Err(e) = file.write_all(description.as_bytes()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(Error::persistence(label, path, e));
        }

        info!(label = %label, path = %path.display(), "Wrote description");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn stamp() -> ArtifactStamp {
        ArtifactStamp::from_datetime(Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap())
    }

    #[test]
    fn test_writes_exact_bytes() {
        let dir = TempDir::new().unwrap();
        let text = "TTL field encodes binary data via even/odd.";
        let path = DescriptionLogger::new(dir.path())
            .write("binary_ttl", text, &stamp())
            .unwrap();

        assert_eq!(
            path.file_name().unwrap(),
            "covert_binary_ttl_description_20240305_140709.txt"
        );
        assert_eq!(fs::read(&path).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_empty_description() {
        let dir = TempDir::new().unwrap();
        let path = DescriptionLogger::new(dir.path())
            .write("blank", "", &stamp())
            .unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_unwritable_location() {
        let dir = TempDir::new().unwrap();
        let logger = DescriptionLogger::new(dir.path().join("nope"));
        let err = logger.write("fixed_seq", "x", &stamp()).unwrap_err();
        assert!(err.is_persistence());
    }

    #[test]
    fn test_existing_file_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let logger = DescriptionLogger::new(dir.path());
        let path = logger.write("fixed_seq", "first", &stamp()).unwrap();
        assert!(logger.write("fixed_seq", "second", &stamp()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
    }
}
