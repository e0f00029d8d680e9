use crate::error::Result;
use crate::extraction::{FileRecord, HeaderReader, IdentifierBuilder, TagScanner};
use crate::types::ScanConfig;
use log::{debug, error};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Files partitioned by composite series key
///
/// Keys iterate in ascending order; files within a group keep the order
/// in which the scan encountered them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct SeriesGroups {
    groups: BTreeMap<String, Vec<PathBuf>>,
}

impl SeriesGroups {
    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Files of the group with exactly this key
    pub fn get(&self, key: &str) -> Option<&[PathBuf]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.groups
            .iter()
            .map(|(key, files)| (key.as_str(), files.as_slice()))
    }

    /// Total number of files over all groups
    pub fn total_files(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Concatenated files of every group whose key starts with `prefix`
    ///
    /// Matching is exact and case sensitive; groups are visited in
    /// ascending key order.
    pub fn files_with_prefix(&self, prefix: &str) -> Vec<PathBuf> {
        self.groups
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .flat_map(|(_, files)| files.iter().cloned())
            .collect()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<PathBuf>> {
        self.groups
    }
}

impl<'a> IntoIterator for &'a SeriesGroups {
    type Item = (&'a String, &'a Vec<PathBuf>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Vec<PathBuf>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partitions the files of a directory into geometrically coherent groups
pub struct SeriesGrouper<R> {
    scanner: TagScanner<R>,
    builder: IdentifierBuilder,
}

impl<R: HeaderReader> SeriesGrouper<R> {
    pub fn new(reader: R, config: &ScanConfig) -> Self {
        Self {
            scanner: TagScanner::new(reader, config),
            builder: IdentifierBuilder::new(&config.restrictions),
        }
    }

    /// Scans a directory and groups its files
    ///
    /// A directory that cannot be read is logged and yields no groups.
    /// Use [`try_scan`](Self::try_scan) to observe the failure.
    pub fn scan(&self, directory: &Path) -> SeriesGroups {
        self.try_scan(directory).unwrap_or_else(|e| {
            error!("Scanner failed scanning {}: {}", directory.display(), e);
            SeriesGroups::default()
        })
    }

    /// Scans a directory and groups its files
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::ScanFailure`](crate::SeriesError::ScanFailure)
    /// if the directory cannot be enumerated
    pub fn try_scan(&self, directory: &Path) -> Result<SeriesGroups> {
        let records = self.scanner.scan(directory)?;
        Ok(self.group_records(records))
    }

    /// Groups already scanned records
    pub fn group_records(&self, records: impl IntoIterator<Item = FileRecord>) -> SeriesGroups {
        let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for record in records {
            if record.path().as_os_str().is_empty() {
                debug!("Ignoring scan entry with empty path");
                continue;
            }
            debug!("File {}", record.path().display());

            let key = self.builder.composite_key(&record);
            groups.entry(key).or_default().push(record.path);
        }

        for (key, files) in &groups {
            debug!("Entry {} with {} files", key, files.len());
        }

        SeriesGroups { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::reader::testing::{axial_slice, write_dicom, MemoryReader};
    use crate::extraction::reader::FileHeaderReader;
    use crate::extraction::SeriesAttribute;
    use crate::grouping::SeriesQuery;
    use dicom_core::Tag;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn touch(dir: &TempDir, names: &[&str]) {
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
    }

    #[test]
    fn test_same_uid_different_spacing_split() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir, &["a.dcm", "b.dcm"]);
        let reader = MemoryReader::default()
            .with_file("a.dcm", &axial_slice("1.2.3", "0.5\\0.5", "0\\0\\0"))
            .with_file("b.dcm", &axial_slice("1.2.3", "0.7\\0.7", "0\\0\\2"));

        let groups = SeriesGrouper::new(reader, &ScanConfig::default()).scan(temp_dir.path());

        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|(_, files)| files.len() == 1));
        assert!(groups.keys().all(|key| key.starts_with("1.2.3")));
    }

    #[test]
    fn test_non_image_file_excluded() {
        let temp_dir = TempDir::new().unwrap();
        write_dicom(
            &temp_dir.path().join("slice1.dcm"),
            "1.2.5.1",
            &axial_slice("1.2.5", "0.5\\0.5", "0\\0\\0"),
        );
        write_dicom(
            &temp_dir.path().join("slice2.dcm"),
            "1.2.5.2",
            &axial_slice("1.2.5", "0.5\\0.5", "0\\0\\2"),
        );
        fs::write(temp_dir.path().join("notes.txt"), b"not an image").unwrap();

        let groups =
            SeriesGrouper::new(FileHeaderReader, &ScanConfig::default()).scan(temp_dir.path());

        assert_eq!(groups.len(), 1);
        let (_, files) = groups.iter().next().unwrap();
        assert_eq!(
            files,
            &[
                temp_dir.path().join("slice1.dcm"),
                temp_dir.path().join("slice2.dcm")
            ]
        );
    }

    #[test]
    fn test_dicom_without_image_matrix_excluded() {
        let temp_dir = TempDir::new().unwrap();
        write_dicom(
            &temp_dir.path().join("s1.dcm"),
            "1.2.5.1",
            &axial_slice("1.2.5", "0.5\\0.5", "0\\0\\0"),
        );
        write_dicom(
            &temp_dir.path().join("s2.dcm"),
            "1.2.5.2",
            &axial_slice("1.2.5", "0.5\\0.5", "0\\0\\2"),
        );
        write_dicom(&temp_dir.path().join("DICOMDIR"), "1.2.5.99", &[]);

        let grouper = SeriesGrouper::new(FileHeaderReader, &ScanConfig::default());
        let groups = grouper.scan(temp_dir.path());

        assert_eq!(groups.len(), 1);
        assert!(groups.get("").is_none());
        assert_eq!(
            SeriesQuery::new(FileHeaderReader, &ScanConfig::default())
                .find_by_prefix(temp_dir.path(), ""),
            [
                temp_dir.path().join("s1.dcm"),
                temp_dir.path().join("s2.dcm")
            ]
        );
    }

    #[test]
    fn test_first_seen_order_within_group() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir, &["1.dcm", "2.dcm", "3.dcm"]);
        // scan order is by file name, not by position
        let reader = MemoryReader::default()
            .with_file("1.dcm", &axial_slice("1.2.3", "1\\1", "0\\0\\4"))
            .with_file("2.dcm", &axial_slice("1.2.3", "1\\1", "0\\0\\0"))
            .with_file("3.dcm", &axial_slice("1.2.3", "1\\1", "0\\0\\2"));

        let groups = SeriesGrouper::new(reader, &ScanConfig::default()).scan(temp_dir.path());
        let (_, files) = groups.iter().next().unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap()).collect();
        assert_eq!(names, ["1.dcm", "2.dcm", "3.dcm"]);
    }

    #[test]
    fn test_scan_failure_yields_empty_groups() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let grouper = SeriesGrouper::new(FileHeaderReader, &ScanConfig::default());

        assert!(grouper.scan(&missing).is_empty());
        assert!(grouper.try_scan(&missing).is_err());
        assert!(grouper.try_scan(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_restriction_splits_groups() {
        let acquisition_number = Tag(0x0020, 0x0012);
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir, &["a.dcm", "b.dcm"]);
        let mut a = axial_slice("1.2.3", "1\\1", "0\\0\\0");
        a.push((acquisition_number, "1"));
        let mut b = axial_slice("1.2.3", "1\\1", "0\\0\\0");
        b.push((acquisition_number, "2"));
        let reader = MemoryReader::default()
            .with_file("a.dcm", &a)
            .with_file("b.dcm", &b);

        let unrestricted = SeriesGrouper::new(&reader, &ScanConfig::default());
        assert_eq!(unrestricted.scan(temp_dir.path()).len(), 1);

        let config = ScanConfig::default().with_restrictions(vec![acquisition_number]);
        let restricted = SeriesGrouper::new(&reader, &config);
        assert_eq!(restricted.scan(temp_dir.path()).len(), 2);
    }

    #[test]
    fn test_group_records_skips_empty_paths() {
        let grouper = SeriesGrouper::new(FileHeaderReader, &ScanConfig::default());
        let records = vec![
            FileRecord::new("").with_attribute(SeriesAttribute::SeriesInstanceUid, "1.2"),
            FileRecord::new("x.dcm").with_attribute(SeriesAttribute::SeriesInstanceUid, "1.2"),
        ];

        let groups = grouper.group_records(records);
        assert_eq!(groups.total_files(), 1);
        assert_eq!(groups.get("1.2"), Some(&[PathBuf::from("x.dcm")][..]));
    }

    #[test]
    fn test_files_with_prefix() {
        let grouper = SeriesGrouper::new(FileHeaderReader, &ScanConfig::default());
        let records = vec![
            FileRecord::new("b1").with_attribute(SeriesAttribute::SeriesInstanceUid, "1.2.9"),
            FileRecord::new("a1").with_attribute(SeriesAttribute::SeriesInstanceUid, "1.2.10"),
            FileRecord::new("c1").with_attribute(SeriesAttribute::SeriesInstanceUid, "2.1"),
            FileRecord::new("a2").with_attribute(SeriesAttribute::SeriesInstanceUid, "1.2.10"),
        ];
        let groups = grouper.group_records(records);

        // "1.2.10" < "1.2.9" in key order
        assert_eq!(
            groups.files_with_prefix("1.2"),
            vec![PathBuf::from("a1"), PathBuf::from("a2"), PathBuf::from("b1")]
        );
        assert_eq!(groups.files_with_prefix("").len(), groups.total_files());
        assert!(groups.files_with_prefix("1.3").is_empty());
        assert!(groups.files_with_prefix("1.2.9.").is_empty());
    }
}
