//! Slice ordering within one series group

mod slice_order;

pub use slice_order::{order_records, SliceOrderer, SortedSlices};
