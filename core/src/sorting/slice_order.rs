use crate::error::{Result, SeriesError};
use crate::extraction::tags::{
    SeriesAttribute, ACQUISITION_TIME, IMAGE_ORIENTATION_PATIENT, IMAGE_POSITION_PATIENT,
};
use crate::extraction::{FileRecord, HeaderReader};
use crate::types::{AcquisitionTime, ImageOrientation, SortConfig};
use dicom_core::Tag;
use log::{debug, error};
use std::path::{Path, PathBuf};

const SORT_TAGS: [Tag; 3] = [
    IMAGE_POSITION_PATIENT,
    IMAGE_ORIENTATION_PATIENT,
    ACQUISITION_TIME,
];

/// Files of one group in slice order, with their spatial layout
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SortedSlices {
    /// Files ordered along the slice normal, then by acquisition time
    pub files: Vec<PathBuf>,

    /// Number of distinct slice planes
    pub planes: usize,

    /// Slices per plane, if every plane holds the same number
    ///
    /// `Some(1)` for a plain 3D volume, `Some(n)` for `n` time steps,
    /// `None` for an irregular or empty group.
    pub time_steps: Option<usize>,
}

impl SortedSlices {
    /// Checks if the slices form a time series of volumes
    pub fn is_4d(&self) -> bool {
        self.time_steps.is_some_and(|t| t > 1)
    }
}

/// Geometry of one slice, as needed for ordering
#[derive(Debug, Clone)]
struct SliceGeometry {
    path: PathBuf,
    distance: f64,
    acquisition_time: Option<AcquisitionTime>,
}

/// Orders the files of one geometrically coherent group
///
/// Slices are ordered by the projection of ImagePositionPatient onto the
/// slice normal. Slices whose projections differ by less than the
/// configured epsilon share a plane and are ordered by AcquisitionTime;
/// a missing time sorts first.
pub struct SliceOrderer<R> {
    reader: R,
    config: SortConfig,
}

impl<R: HeaderReader> SliceOrderer<R> {
    pub fn new(reader: R, config: SortConfig) -> Self {
        Self { reader, config }
    }

    /// Sorts files into slice order
    ///
    /// # Errors
    ///
    /// - [`SeriesError::UnreadableFile`] if a file cannot be read
    /// - [`SeriesError::MissingAttribute`] if a file lacks position or orientation
    /// - [`SeriesError::InconsistentOrientation`] if orientations differ
    pub fn sort(&self, files: &[impl AsRef<Path>]) -> Result<Vec<PathBuf>> {
        Ok(self.sort_with_layout(files)?.files)
    }

    /// Sorts files into slice order and reports planes and time steps
    ///
    /// # Errors
    ///
    /// Same as [`sort`](Self::sort)
    pub fn sort_with_layout(&self, files: &[impl AsRef<Path>]) -> Result<SortedSlices> {
        let records = files
            .iter()
            .map(|path| self.reader.read_record(path.as_ref(), &SORT_TAGS))
            .collect::<Result<Vec<_>>>()?;
        order_records(&records, &self.config)
    }
}

/// Orders already read records
///
/// # Errors
///
/// - [`SeriesError::MissingAttribute`] if a record lacks position or orientation
/// - [`SeriesError::InconsistentOrientation`] if orientations differ
pub fn order_records(records: &[FileRecord], config: &SortConfig) -> Result<SortedSlices> {
    let Some(first) = records.first() else {
        return Ok(SortedSlices::default());
    };
    let orientation = required_orientation(first)?;
    let normal = orientation.normal();
    debug!("Slice normal {} for {} files", normal, records.len());

    let mut slices = Vec::with_capacity(records.len());
    for record in records {
        let found = required_orientation(record)?;
        if found != orientation {
            error!("DICOM images have different orientations");
            return Err(SeriesError::InconsistentOrientation {
                path: record.path.clone(),
                expected: orientation.to_string(),
                found: found.to_string(),
            });
        }

        let position = record
            .position()
            .ok_or_else(|| missing(record, SeriesAttribute::ImagePosition))?;
        slices.push(SliceGeometry {
            path: record.path.clone(),
            distance: normal.dot(&position),
            acquisition_time: record.acquisition_time(),
        });
    }

    // Epsilon comparison is not transitive, so slices are first clustered
    // into planes and then sorted by (plane, time), which is a total order.
    slices.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    let planes = assign_planes(&slices, config.epsilon);

    let mut ordered: Vec<(usize, SliceGeometry)> = planes.iter().copied().zip(slices).collect();
    ordered.sort_by(|(plane_a, a), (plane_b, b)| {
        plane_a
            .cmp(plane_b)
            .then_with(|| a.acquisition_time.cmp(&b.acquisition_time))
    });

    let plane_count = planes.last().map_or(0, |p| p + 1);
    let time_steps = uniform_plane_size(&planes, plane_count);
    debug!(
        "Sorted {} slices into {} planes ({:?} time steps)",
        ordered.len(),
        plane_count,
        time_steps
    );

    Ok(SortedSlices {
        files: ordered.into_iter().map(|(_, slice)| slice.path).collect(),
        planes: plane_count,
        time_steps,
    })
}

/// Plane index of each slice, for slices sorted by distance
///
/// A slice starts a new plane once it is at least `epsilon` away from the
/// first slice of the current plane.
fn assign_planes(slices: &[SliceGeometry], epsilon: f64) -> Vec<usize> {
    let mut planes = Vec::with_capacity(slices.len());
    let mut plane = 0;
    let mut plane_start = slices.first().map_or(0.0, |s| s.distance);

    for slice in slices {
        if (slice.distance - plane_start).abs() >= epsilon {
            plane += 1;
            plane_start = slice.distance;
        }
        planes.push(plane);
    }
    planes
}

fn uniform_plane_size(planes: &[usize], plane_count: usize) -> Option<usize> {
    let mut sizes = vec![0usize; plane_count];
    for plane in planes {
        sizes[*plane] += 1;
    }
    match sizes.split_first() {
        Some((first, rest)) if rest.iter().all(|s| s == first) => Some(*first),
        _ => None,
    }
}

fn required_orientation(record: &FileRecord) -> Result<ImageOrientation> {
    record
        .orientation()
        .ok_or_else(|| missing(record, SeriesAttribute::ImageOrientation))
}

fn missing(record: &FileRecord, attribute: SeriesAttribute) -> SeriesError {
    SeriesError::MissingAttribute {
        path: record.path.clone(),
        attribute: attribute.to_string(),
    }
}
