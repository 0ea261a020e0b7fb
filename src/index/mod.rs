//! Column Index Module
//!
//! The ordered column → value container held by every key.
//!
//! ## Responsibilities
//! - Point lookups, insert-or-update and deletes by column
//! - Ascending iteration over all columns
//! - Inclusive range slices with a configurable stop policy
//!
//! ## Data Structure Choice
//! A plain BTreeMap: columns only need `Ord`, iteration is already sorted,
//! and `BTreeMap::range` gives the lower bound of a slice directly.

mod column_index;

pub use column_index::{ColumnIndex, Range};

/// How a slice treats its `stop` column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlicePolicy {
    /// `stop` is a sentinel: the scan ends right after the column equal to
    /// `stop`. If no column equals `stop` the scan runs to the end.
    #[default]
    ExactStop,

    /// `stop` is an inclusive upper bound: every column in `[start, stop]`.
    UpperBound,
}
