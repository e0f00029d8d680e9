use crate::error::{Result, SeriesError};
use crate::extraction::tags::{parse_tag, SeriesAttribute};
use dicom_core::Tag;

/// Default tolerance (mm) below which two slice projections count as the
/// same plane
pub const DEFAULT_SLICE_EPSILON: f64 = 1e-5;

/// Configuration for directory scanning and series grouping
///
/// # Example
///
/// ```
/// use dcmseries_core::ScanConfig;
/// use dicom_core::Tag;
///
/// let config = ScanConfig::from_restriction_strs(["0020|0012", "(0008,0060)"]).unwrap();
/// assert_eq!(config.restrictions, vec![Tag(0x0020, 0x0012), Tag(0x0008, 0x0060)]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanConfig {
    /// Extra attributes that must match for files to share a group,
    /// in the order they are appended to the composite key
    pub restrictions: Vec<Tag>,
}

impl ScanConfig {
    /// Parses restriction identifiers such as `0020|0012` or `(0020,0012)`
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidTag`](crate::SeriesError::InvalidTag)
    /// for the first identifier that cannot be parsed
    pub fn from_restriction_strs<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = items
            .into_iter()
            .map(|s| parse_tag(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::default().with_restrictions(tags))
    }

    /// Builder: Set restriction tags
    ///
    /// Duplicates and attributes already part of every composite key are
    /// dropped, keeping the first occurrence.
    ///
    /// # Example
    ///
    /// ```
    /// use dcmseries_core::ScanConfig;
    /// use dicom_core::Tag;
    ///
    /// // (0028,0030) PixelSpacing is always part of the key
    /// let config = ScanConfig::default()
    ///     .with_restrictions(vec![Tag(0x0028, 0x0030), Tag(0x0020, 0x0012)]);
    /// assert_eq!(config.restrictions, vec![Tag(0x0020, 0x0012)]);
    /// ```
    pub fn with_restrictions(mut self, tags: Vec<Tag>) -> Self {
        let mut restrictions: Vec<Tag> = Vec::with_capacity(tags.len());
        for tag in tags {
            let in_key = SeriesAttribute::KEY_ATTRIBUTES
                .iter()
                .any(|attr| attr.tag() == tag);
            if !in_key && !restrictions.contains(&tag) {
                restrictions.push(tag);
            }
        }
        self.restrictions = restrictions;
        self
    }

    /// All tags the scanner must read for each file
    pub fn scanned_tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = SeriesAttribute::ALL.iter().map(|a| a.tag()).collect();
        for tag in &self.restrictions {
            if !tags.contains(tag) {
                tags.push(*tag);
            }
        }
        tags
    }
}

/// Configuration for slice ordering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortConfig {
    /// Projections closer than this share a plane and fall back to
    /// acquisition time
    pub epsilon: f64,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_SLICE_EPSILON,
        }
    }
}

impl SortConfig {
    /// Builder: Set the same-plane tolerance
    ///
    /// # Example
    ///
    /// ```
    /// use dcmseries_core::SortConfig;
    ///
    /// let config = SortConfig::default().with_epsilon(0.01);
    /// assert_eq!(config.epsilon, 0.01);
    /// ```
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.abs();
        self
    }

    /// Creates a sort configuration from a user supplied tolerance
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidValue`] for NaN or infinite values
    pub fn from_epsilon(epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() {
            return Err(SeriesError::InvalidValue(format!(
                "slice epsilon must be finite, got {}",
                epsilon
            )));
        }
        Ok(Self::default().with_epsilon(epsilon))
    }
}
