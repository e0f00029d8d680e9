use crate::error::{Result, SeriesError};
use crate::extraction::reader::HeaderReader;
use crate::extraction::record::FileRecord;
use crate::types::ScanConfig;
use dicom_core::Tag;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the identification attributes of every file in a directory
///
/// The scan is non-recursive and never decodes pixel data. Files the
/// reader does not recognize are skipped.
pub struct TagScanner<R> {
    reader: R,
    tags: Vec<Tag>,
}

impl<R: HeaderReader> TagScanner<R> {
    /// Creates a scanner reading the fixed attribute set plus the
    /// configured restrictions
    pub fn new(reader: R, config: &ScanConfig) -> Self {
        Self {
            reader,
            tags: config.scanned_tags(),
        }
    }

    /// Tags read from each file
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Scans a directory
    ///
    /// Records are returned in file-name order.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::ScanFailure`] if the directory cannot be
    /// enumerated. Unreadable individual files are not errors.
    pub fn scan(&self, directory: &Path) -> Result<Vec<FileRecord>> {
        let paths = list_files(directory)?;
        debug!(
            "Scanning {} files in {}",
            paths.len(),
            directory.display()
        );

        let records: Vec<FileRecord> = paths
            .into_iter()
            .filter_map(|path| match self.reader.read_record(&path, &self.tags) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        debug!(
            "Read headers of {} files in {}",
            records.len(),
            directory.display()
        );
        Ok(records)
    }
}

/// Lists the regular files directly inside a directory, sorted by name
fn list_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let scan_failure = |source: std::io::Error| SeriesError::ScanFailure {
        directory: directory.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(directory).map_err(scan_failure)? {
        let path = entry.map_err(scan_failure)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
