use crate::error::Result;
use crate::extraction::{FileHeaderReader, HeaderReader};
use crate::grouping::{SeriesGrouper, SeriesGroups, SeriesQuery};
use crate::sorting::{SliceOrderer, SortedSlices};
use crate::types::{ScanConfig, SortConfig};
use std::path::{Path, PathBuf};

/// Main entry point for series discovery and slice ordering
///
/// Bundles a header reader with scan and sort configuration. Grouping and
/// sorting are separate steps: groups come back in scan order and must be
/// sorted explicitly.
///
/// # Example
///
/// ```no_run
/// use dcmseries_core::SeriesReader;
/// use std::path::Path;
///
/// let reader = SeriesReader::new();
/// let groups = reader.get_series(Path::new("dicom"));
/// for (key, files) in groups.iter() {
///     let sorted = reader.sort_series_slices(files).unwrap();
///     println!("{}: {} slices", key, sorted.len());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeriesReader<R = FileHeaderReader> {
    reader: R,
    scan_config: ScanConfig,
    sort_config: SortConfig,
}

impl SeriesReader<FileHeaderReader> {
    /// Creates a reader for DICOM files on disk with default configuration
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: HeaderReader> SeriesReader<R> {
    /// Creates a reader using a custom header source
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            scan_config: ScanConfig::default(),
            sort_config: SortConfig::default(),
        }
    }

    /// Builder: Set scan configuration
    pub fn with_scan_config(mut self, config: ScanConfig) -> Self {
        self.scan_config = config;
        self
    }

    /// Builder: Set sort configuration
    pub fn with_sort_config(mut self, config: SortConfig) -> Self {
        self.sort_config = config;
        self
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan_config
    }

    pub fn sort_config(&self) -> &SortConfig {
        &self.sort_config
    }

    /// Groups the files of a directory by composite series key
    ///
    /// An unreadable directory is logged and yields no groups.
    pub fn get_series(&self, directory: &Path) -> SeriesGroups {
        SeriesGrouper::new(&self.reader, &self.scan_config).scan(directory)
    }

    /// Groups the files of a directory by composite series key
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::ScanFailure`](crate::SeriesError::ScanFailure)
    /// if the directory cannot be enumerated
    pub fn try_get_series(&self, directory: &Path) -> Result<SeriesGroups> {
        SeriesGrouper::new(&self.reader, &self.scan_config).try_scan(directory)
    }

    /// Files of every group whose key starts with `prefix`
    pub fn get_series_by_prefix(&self, directory: &Path, prefix: &str) -> Vec<PathBuf> {
        SeriesQuery::new(&self.reader, &self.scan_config).find_by_prefix(directory, prefix)
    }

    /// Sorts the files of one group into slice order
    ///
    /// # Errors
    ///
    /// See [`SliceOrderer::sort`]
    pub fn sort_series_slices(&self, files: &[impl AsRef<Path>]) -> Result<Vec<PathBuf>> {
        SliceOrderer::new(&self.reader, self.sort_config).sort(files)
    }

    /// Sorts the files of one group and reports its plane/time layout
    ///
    /// # Errors
    ///
    /// See [`SliceOrderer::sort`]
    pub fn sort_with_layout(&self, files: &[impl AsRef<Path>]) -> Result<SortedSlices> {
        SliceOrderer::new(&self.reader, self.sort_config).sort_with_layout(files)
    }

    /// Checks whether the file is recognized as DICOM
    pub fn is_dicom(&self, path: &Path) -> bool {
        self.reader.is_dicom(path)
    }
}

/// Describes the build: crate version and DICOM backend
pub fn configuration_string() -> String {
    format!(
        "DCMSERIES_VERSION: {}\nDICOM_BACKEND: dicom-rs (dicom-object)",
        env!("CARGO_PKG_VERSION")
    )
}
