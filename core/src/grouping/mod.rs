//! Series grouping and lookup
//!
//! Splits the files of a directory into groups that can each be stacked
//! into one volume, and selects groups by key prefix.

mod grouper;
mod query;

pub use grouper::{SeriesGrouper, SeriesGroups};
pub use query::SeriesQuery;
