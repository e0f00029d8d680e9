use crate::error::{Result, SeriesError};
use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_core::Tag;
use dicom_dictionary_std::StandardDataDictionary;
use dicom_object::InMemDicomObject;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

// Series Identification Tags
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);

// Image Geometry Tags
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag(0x0020, 0x0037);
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);

// Timing Tags
pub const ACQUISITION_TIME: Tag = Tag(0x0008, 0x0032);

// Reading stops here; nothing past the header is needed
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Attributes read from every scanned file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeriesAttribute {
    SeriesInstanceUid,
    Rows,
    Columns,
    PixelSpacing,
    SliceThickness,
    ImageOrientation,
    ImagePosition,
    AcquisitionTime,
}

/// (attribute, tag, keyword) lookup table, indexed by discriminant
const ATTRIBUTE_TABLE: [(SeriesAttribute, Tag, &str); 8] = [
    (
        SeriesAttribute::SeriesInstanceUid,
        SERIES_INSTANCE_UID,
        "SeriesInstanceUID",
    ),
    (SeriesAttribute::Rows, ROWS, "Rows"),
    (SeriesAttribute::Columns, COLUMNS, "Columns"),
    (SeriesAttribute::PixelSpacing, PIXEL_SPACING, "PixelSpacing"),
    (
        SeriesAttribute::SliceThickness,
        SLICE_THICKNESS,
        "SliceThickness",
    ),
    (
        SeriesAttribute::ImageOrientation,
        IMAGE_ORIENTATION_PATIENT,
        "ImageOrientationPatient",
    ),
    (
        SeriesAttribute::ImagePosition,
        IMAGE_POSITION_PATIENT,
        "ImagePositionPatient",
    ),
    (
        SeriesAttribute::AcquisitionTime,
        ACQUISITION_TIME,
        "AcquisitionTime",
    ),
];

impl SeriesAttribute {
    /// Every attribute the scanner reads
    pub const ALL: [SeriesAttribute; 8] = [
        SeriesAttribute::SeriesInstanceUid,
        SeriesAttribute::Rows,
        SeriesAttribute::Columns,
        SeriesAttribute::PixelSpacing,
        SeriesAttribute::SliceThickness,
        SeriesAttribute::ImageOrientation,
        SeriesAttribute::ImagePosition,
        SeriesAttribute::AcquisitionTime,
    ];

    /// Attributes appended (normalized) after the series UID, in key order
    pub const IDENTIFIER_PARTS: [SeriesAttribute; 5] = [
        SeriesAttribute::Rows,
        SeriesAttribute::Columns,
        SeriesAttribute::PixelSpacing,
        SeriesAttribute::SliceThickness,
        SeriesAttribute::ImageOrientation,
    ];

    /// Every attribute that contributes to a composite key
    pub const KEY_ATTRIBUTES: [SeriesAttribute; 6] = [
        SeriesAttribute::SeriesInstanceUid,
        SeriesAttribute::Rows,
        SeriesAttribute::Columns,
        SeriesAttribute::PixelSpacing,
        SeriesAttribute::SliceThickness,
        SeriesAttribute::ImageOrientation,
    ];

    pub fn tag(self) -> Tag {
        ATTRIBUTE_TABLE[self as usize].1
    }

    pub fn keyword(self) -> &'static str {
        ATTRIBUTE_TABLE[self as usize].2
    }

    /// Looks up the attribute for a tag, if it is one of ours
    pub fn from_tag(tag: Tag) -> Option<Self> {
        ATTRIBUTE_TABLE
            .iter()
            .find(|(_, t, _)| *t == tag)
            .map(|(attr, _, _)| *attr)
    }
}

impl fmt::Display for SeriesAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword(), self.tag())
    }
}

/// Human readable name for a tag
///
/// Restriction tags are looked up in the standard dictionary; private or
/// unknown tags are rendered as `(gggg,eeee)`.
pub fn describe_tag(tag: Tag) -> String {
    if let Some(attr) = SeriesAttribute::from_tag(tag) {
        return attr.to_string();
    }
    match StandardDataDictionary.by_tag(tag) {
        Some(entry) => format!("{} {}", entry.alias(), tag),
        None => tag.to_string(),
    }
}

/// Parses an attribute identifier
///
/// Accepts `gggg|eeee`, `gggg,eeee`, `(gggg,eeee)` and `ggggeeee`
/// with hexadecimal digits.
///
/// # Errors
///
/// Returns [`SeriesError::InvalidTag`] if the identifier does not match
pub fn parse_tag(s: &str) -> Result<Tag> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^\(?\s*([0-9A-Fa-f]{4})\s*[|,]?\s*([0-9A-Fa-f]{4})\s*\)?$")
            .expect("Failed to compile regex")
    });

    let caps = re
        .captures(s.trim())
        .ok_or_else(|| SeriesError::InvalidTag(s.to_string()))?;
    let group = u16::from_str_radix(&caps[1], 16)
        .map_err(|e| SeriesError::InvalidTag(format!("{}: {}", s, e)))?;
    let element = u16::from_str_radix(&caps[2], 16)
        .map_err(|e| SeriesError::InvalidTag(format!("{}: {}", s, e)))?;
    Ok(Tag(group, element))
}

/// Helper to get the raw string value of a DICOM tag
///
/// Multi-valued elements are joined with backslashes, numeric elements are
/// rendered as text. Trailing padding is trimmed. Returns `None` only if
/// the tag is absent or cannot be rendered; an empty value yields
/// `Some("")`.
pub fn get_raw_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim_end_matches(['\0', ' ']).to_string())
}
