use crate::extraction::tags::{get_raw_value, SeriesAttribute};
use crate::types::{AcquisitionTime, ImageOrientation, Vector3};
use dicom_core::Tag;
use dicom_object::InMemDicomObject;
use log::warn;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A scanned file: its path plus the raw values of the tags read from it
///
/// Raw values are kept as text, exactly as rendered by the DICOM reader,
/// because composite keys are built from them. Typed accessors parse on
/// demand. Absent tags have no entry, empty tags map to `""`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileRecord {
    /// Path to the DICOM file
    pub path: PathBuf,

    values: BTreeMap<Tag, String>,
}

impl FileRecord {
    /// Creates a record without any tag values
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: BTreeMap::new(),
        }
    }

    /// Creates a record from an already-opened DICOM object
    ///
    /// # Arguments
    ///
    /// * `path` - Path the object was read from
    /// * `dcm` - Opened DICOM object
    /// * `tags` - Tags to copy into the record; absent ones are skipped
    pub fn from_dicom(path: impl Into<PathBuf>, dcm: &InMemDicomObject, tags: &[Tag]) -> Self {
        let values = tags
            .iter()
            .filter_map(|tag| get_raw_value(dcm, *tag).map(|value| (*tag, value)))
            .collect();
        Self {
            path: path.into(),
            values,
        }
    }

    /// Builder: Set a raw tag value
    pub fn with_value(mut self, tag: Tag, value: impl Into<String>) -> Self {
        self.values.insert(tag, value.into());
        self
    }

    /// Builder: Set a raw value for one of the scanned attributes
    pub fn with_attribute(self, attribute: SeriesAttribute, value: impl Into<String>) -> Self {
        self.with_value(attribute.tag(), value)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw value of a tag, `None` if the tag was absent
    pub fn raw_value(&self, tag: Tag) -> Option<&str> {
        self.values.get(&tag).map(String::as_str)
    }

    pub fn attribute(&self, attribute: SeriesAttribute) -> Option<&str> {
        self.raw_value(attribute.tag())
    }

    pub fn series_instance_uid(&self) -> Option<&str> {
        self.attribute(SeriesAttribute::SeriesInstanceUid)
    }

    pub fn orientation(&self) -> Option<ImageOrientation> {
        self.parsed(SeriesAttribute::ImageOrientation, ImageOrientation::parse)
    }

    pub fn position(&self) -> Option<Vector3> {
        self.parsed(SeriesAttribute::ImagePosition, Vector3::parse)
    }

    /// Acquisition time, `None` if absent, empty or malformed
    pub fn acquisition_time(&self) -> Option<AcquisitionTime> {
        match self.attribute(SeriesAttribute::AcquisitionTime) {
            Some(v) if !v.trim().is_empty() => self.parsed(
                SeriesAttribute::AcquisitionTime,
                AcquisitionTime::parse,
            ),
            _ => None,
        }
    }

    fn parsed<T>(
        &self,
        attribute: SeriesAttribute,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Option<T> {
        let raw = self.attribute(attribute)?;
        match parse(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring {} in {}: {}", attribute, self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::tags::{ACQUISITION_TIME, ROWS, SERIES_INSTANCE_UID};
    use dicom_core::value::PrimitiveValue;
    use dicom_core::{DataElement, VR};

    fn axial_record() -> FileRecord {
        FileRecord::new("slice1.dcm")
            .with_attribute(SeriesAttribute::SeriesInstanceUid, "1.2.3")
            .with_attribute(SeriesAttribute::Rows, "512")
            .with_attribute(SeriesAttribute::Columns, "256")
            .with_attribute(SeriesAttribute::PixelSpacing, "0.5\\0.75")
            .with_attribute(SeriesAttribute::SliceThickness, "2.0")
            .with_attribute(SeriesAttribute::ImageOrientation, "1\\0\\0\\0\\1\\0")
            .with_attribute(SeriesAttribute::ImagePosition, "-10\\-20\\4")
            .with_attribute(SeriesAttribute::AcquisitionTime, "113000")
    }

    #[test]
    fn test_typed_accessors() {
        let record = axial_record();
        assert_eq!(record.series_instance_uid(), Some("1.2.3"));
        assert_eq!(record.attribute(SeriesAttribute::PixelSpacing), Some("0.5\\0.75"));
        assert_eq!(
            record.orientation().map(|o| o.normal()),
            Some(Vector3::new(0.0, 0.0, 1.0))
        );
        assert_eq!(record.position(), Some(Vector3::new(-10.0, -20.0, 4.0)));
        assert_eq!(
            record.acquisition_time(),
            Some(AcquisitionTime::from_hms_micro(11, 30, 0, 0))
        );
    }

    #[test]
    fn test_absent_and_malformed_values() {
        let record = FileRecord::new("x.dcm")
            .with_attribute(SeriesAttribute::ImagePosition, "1\\2")
            .with_attribute(SeriesAttribute::AcquisitionTime, "");
        assert_eq!(record.position(), None);
        assert_eq!(record.acquisition_time(), None);
        assert_eq!(record.attribute(SeriesAttribute::AcquisitionTime), Some(""));
        assert_eq!(record.attribute(SeriesAttribute::Rows), None);
    }

    #[test]
    fn test_from_dicom_copies_requested_tags_only() {
        let dcm = InMemDicomObject::from_element_iter([
            DataElement::new(SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from("1.2.840.1")),
            DataElement::new(ROWS, VR::US, PrimitiveValue::from(64_u16)),
            DataElement::new(ACQUISITION_TIME, VR::TM, PrimitiveValue::from("120000")),
        ]);

        let record = FileRecord::from_dicom("a.dcm", &dcm, &[SERIES_INSTANCE_UID, ROWS]);
        assert_eq!(record.series_instance_uid(), Some("1.2.840.1"));
        assert_eq!(record.raw_value(ROWS), Some("64"));
        assert_eq!(record.raw_value(ACQUISITION_TIME), None);
        assert_eq!(record.path(), Path::new("a.dcm"));
    }
}
