use crate::extraction::HeaderReader;
use crate::grouping::grouper::SeriesGrouper;
use crate::types::ScanConfig;
use log::debug;
use std::path::{Path, PathBuf};

/// Looks up files by composite key prefix
///
/// A plain SeriesInstanceUID is a valid prefix and selects every
/// geometric sub-group of that series.
pub struct SeriesQuery<R> {
    grouper: SeriesGrouper<R>,
}

impl<R: HeaderReader> SeriesQuery<R> {
    pub fn new(reader: R, config: &ScanConfig) -> Self {
        Self {
            grouper: SeriesGrouper::new(reader, config),
        }
    }

    /// Files of every group in `directory` whose key starts with `prefix`
    ///
    /// Groups are concatenated in ascending key order. An unreadable
    /// directory yields no files.
    pub fn find_by_prefix(&self, directory: &Path, prefix: &str) -> Vec<PathBuf> {
        let groups = self.grouper.scan(directory);
        let files = groups.files_with_prefix(prefix);
        debug!(
            "{} of {} files in {} match '{}'",
            files.len(),
            groups.total_files(),
            directory.display(),
            prefix
        );
        files
    }
}
