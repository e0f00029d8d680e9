use std::path::PathBuf;
use thiserror::Error;

/// Result type for dcmseries operations
pub type Result<T> = std::result::Result<T, SeriesError>;

/// Error types for series scanning and slice ordering
#[derive(Error, Debug)]
pub enum SeriesError {
    /// The directory could not be enumerated
    #[error("Failed to scan directory {}: {source}", directory.display())]
    ScanFailure {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value that must not be empty was empty
    #[error("Tag value is empty")]
    EmptyValue,

    /// File is not a readable DICOM file
    #[error("Unreadable file {}: {reason}", path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    /// Attribute required for slice ordering is absent
    #[error("Missing attribute {attribute} in {}", path.display())]
    MissingAttribute { path: PathBuf, attribute: String },

    /// Files with different orientations were passed to the slice orderer
    #[error(
        "Inconsistent image orientation in {}: expected {expected}, found {found}. \
         Group files with SeriesGrouper before sorting",
        path.display()
    )]
    InconsistentOrientation {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// Attribute identifier could not be parsed
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_failure_message_names_directory() {
        let err = SeriesError::ScanFailure {
            directory: PathBuf::from("/no/such/dir"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/no/such/dir"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SeriesError = io.into();
        assert!(matches!(err, SeriesError::IoError(_)));
    }
}
