//! Composite series identifiers
//!
//! A DICOM SeriesInstanceUID alone does not guarantee a geometrically
//! homogeneous volume. Files are therefore keyed by the UID followed by
//! tokens for matrix size, pixel spacing, slice thickness and orientation.

use crate::error::{Result, SeriesError};
use crate::extraction::record::FileRecord;
use crate::extraction::tags::{describe_tag, SeriesAttribute};
use dicom_core::Tag;
use log::{debug, error};

/// Separator appended after every normalized token
pub const DELIMITER: char = '.';

/// Builds composite keys for scanned files
#[derive(Debug, Clone, Default)]
pub struct IdentifierBuilder {
    restrictions: Vec<Tag>,
}

impl IdentifierBuilder {
    /// Creates a builder that appends the given restriction tags after the
    /// fixed identifier parts
    pub fn new(restrictions: &[Tag]) -> Self {
        Self {
            restrictions: restrictions.to_vec(),
        }
    }

    /// Turns a raw tag value into an identifier-safe token
    ///
    /// Every character other than ASCII letters, ASCII digits and `.` is
    /// removed, then the delimiter is appended.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::EmptyValue`] for an empty value
    ///
    /// # Example
    ///
    /// ```
    /// use dcmseries_core::IdentifierBuilder;
    ///
    /// assert_eq!(IdentifierBuilder::normalize("0.5\\0.5 ").unwrap(), "0.50.5.");
    /// assert!(IdentifierBuilder::normalize("").is_err());
    /// ```
    pub fn normalize(value: &str) -> Result<String> {
        if value.is_empty() {
            return Err(SeriesError::EmptyValue);
        }

        let mut token: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == DELIMITER)
            .collect();
        token.push(DELIMITER);
        Ok(token)
    }

    /// Builds the composite key of a file
    ///
    /// The raw SeriesInstanceUID comes first and is not normalized. Rows,
    /// columns, pixel spacing, slice thickness, image orientation and any
    /// restrictions follow as normalized tokens. One trailing delimiter is
    /// removed. Absent or empty values are logged and contribute nothing.
    pub fn composite_key(&self, record: &FileRecord) -> String {
        let mut key = match record.series_instance_uid() {
            Some(uid) => uid.to_string(),
            None => {
                error!(
                    "No SeriesInstanceUID in {}. Something is seriously wrong with this image",
                    record.path().display()
                );
                String::new()
            }
        };

        let parts = SeriesAttribute::IDENTIFIER_PARTS
            .iter()
            .map(|attr| attr.tag())
            .chain(self.restrictions.iter().copied());
        for tag in parts {
            key.push_str(&Self::identifier_part(record, tag));
        }

        if key.ends_with(DELIMITER) {
            key.pop();
        }

        debug!("ID: {}", key);
        key
    }

    fn identifier_part(record: &FileRecord, tag: Tag) -> String {
        let Some(value) = record.raw_value(tag) else {
            error!(
                "Could not access tag {} in {}: not present",
                describe_tag(tag),
                record.path().display()
            );
            return String::new();
        };

        Self::normalize(value).unwrap_or_else(|e| {
            error!(
                "Could not access tag {} in {}: {}",
                describe_tag(tag),
                record.path().display(),
                e
            );
            String::new()
        })
    }
}
