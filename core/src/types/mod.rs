//! Core value types for series scanning and slice ordering
//!
//! - [`Vector3`] and [`ImageOrientation`]: patient-space geometry
//! - [`AcquisitionTime`]: parsed DICOM TM values used as a tie-break
//! - [`ScanConfig`] and [`SortConfig`]: configuration for grouping and sorting

mod acquisition_time;
mod config;
mod geometry;

pub use acquisition_time::AcquisitionTime;
pub use config::{ScanConfig, SortConfig, DEFAULT_SLICE_EPSILON};
pub use geometry::{ImageOrientation, Vector3};
