use crate::error::{Result, SeriesError};
use crate::extraction::record::FileRecord;
use crate::extraction::tags::{COLUMNS, PIXEL_DATA, ROWS};
use dicom_core::Tag;
use dicom_object::OpenFileOptions;
use std::path::Path;

/// Source of DICOM header attributes for a file
///
/// Implementations must report a file they cannot interpret as an error
/// (typically [`SeriesError::UnreadableFile`]) and must leave absent tags
/// out of the returned record rather than storing empty values.
pub trait HeaderReader {
    /// Reads the given tags from the file header
    fn read_record(&self, path: &Path, tags: &[Tag]) -> Result<FileRecord>;

    /// Checks whether the file is recognized as a DICOM image
    fn is_dicom(&self, path: &Path) -> bool {
        self.read_record(path, &[]).is_ok()
    }
}

impl<R: HeaderReader + ?Sized> HeaderReader for &R {
    fn read_record(&self, path: &Path, tags: &[Tag]) -> Result<FileRecord> {
        (**self).read_record(path, tags)
    }

    fn is_dicom(&self, path: &Path) -> bool {
        (**self).is_dicom(path)
    }
}

/// Reads DICOM files from disk, stopping before the pixel data
///
/// Objects without an image matrix (Rows and Columns), such as DICOMDIR or
/// structured reports, are reported as unreadable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileHeaderReader;

impl HeaderReader for FileHeaderReader {
    fn read_record(&self, path: &Path, tags: &[Tag]) -> Result<FileRecord> {
        let dcm = OpenFileOptions::new()
            .read_until(PIXEL_DATA)
            .open_file(path)
            .map_err(|e| SeriesError::UnreadableFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if dcm.element(ROWS).is_err() || dcm.element(COLUMNS).is_err() {
            return Err(SeriesError::UnreadableFile {
                path: path.to_path_buf(),
                reason: "not an image: Rows or Columns missing".to_string(),
            });
        }
        Ok(FileRecord::from_dicom(path, &dcm, tags))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::write_dicom;
    use super::*;
    use crate::extraction::tags::{COLUMNS, ROWS, SERIES_INSTANCE_UID, SLICE_THICKNESS};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_record_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slice.dcm");
        write_dicom(
            &path,
            "1.2.3.4.1",
            &[
                (SERIES_INSTANCE_UID, "1.2.3.4"),
                (ROWS, "128"),
                (COLUMNS, "96"),
            ],
        );

        let record = FileHeaderReader
            .read_record(&path, &[SERIES_INSTANCE_UID, ROWS, SLICE_THICKNESS])
            .unwrap();
        assert_eq!(record.series_instance_uid(), Some("1.2.3.4"));
        assert_eq!(record.raw_value(ROWS), Some("128"));
        assert_eq!(record.raw_value(SLICE_THICKNESS), None);
        assert_eq!(record.path(), path.as_path());
    }

    #[test]
    fn test_non_dicom_file_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, b"This is not a DICOM file").unwrap();

        let result = FileHeaderReader.read_record(&path, &[SERIES_INSTANCE_UID]);
        assert!(matches!(result, Err(SeriesError::UnreadableFile { .. })));
        assert!(!FileHeaderReader.is_dicom(&path));
    }

    #[test]
    fn test_is_dicom() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slice");
        write_dicom(
            &path,
            "1.2.3.4.2",
            &[(SERIES_INSTANCE_UID, "1.2.3.4"), (ROWS, "64"), (COLUMNS, "64")],
        );
        assert!(FileHeaderReader.is_dicom(&path));
    }

    #[test]
    fn test_dicom_without_image_matrix_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("DICOMDIR");
        write_dicom(&path, "1.2.3.4.3", &[(SERIES_INSTANCE_UID, "1.2.3.4")]);

        let result = FileHeaderReader.read_record(&path, &[SERIES_INSTANCE_UID]);
        assert!(matches!(result, Err(SeriesError::UnreadableFile { .. })));
        assert!(!FileHeaderReader.is_dicom(&path));
    }
}
