pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod grouping;
pub mod sorting;
pub mod types;

pub use api::{configuration_string, SeriesReader};
pub use error::{Result, SeriesError};
pub use extraction::{FileHeaderReader, FileRecord, HeaderReader, IdentifierBuilder, TagScanner};
pub use grouping::{SeriesGrouper, SeriesGroups, SeriesQuery};
pub use sorting::{SliceOrderer, SortedSlices};
pub use types::*;
