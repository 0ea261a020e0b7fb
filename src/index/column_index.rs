//! ColumnIndex implementation
//!
//! BTreeMap-backed ordered map from column to value.

use std::borrow::Borrow;
use std::collections::btree_map::{self, BTreeMap};
use std::iter::FusedIterator;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use super::SlicePolicy;

/// Ordered column → value entries for a single key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "C: Serialize, V: Serialize",
    deserialize = "C: Ord + Deserialize<'de>, V: Deserialize<'de>"
))]
pub struct ColumnIndex<C, V> {
    entries: BTreeMap<C, V>,
}

impl<C: Ord, V> ColumnIndex<C, V> {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert a value, overwriting any existing value for the column.
    /// Returns the previous value.
    pub fn insert_or_update(&mut self, column: C, value: V) -> Option<V> {
        self.entries.insert(column, value)
    }

    /// Get the value stored under a column
    pub fn get<Q>(&self, column: &Q) -> Option<&V>
    where
        C: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(column)
    }

    /// Remove a column. Missing columns are a no-op.
    pub fn delete<Q>(&mut self, column: &Q) -> Option<V>
    where
        C: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.remove(column)
    }

    pub fn contains<Q>(&self, column: &Q) -> bool
    where
        C: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.contains_key(column)
    }

    /// All entries in ascending column order
    pub fn items(&self) -> btree_map::Iter<'_, C, V> {
        self.entries.iter()
    }

    /// Slice with the default exact-stop policy
    ///
    /// Starts at `start` (inclusive) or the first column, and ends right
    /// after the column equal to `stop`. A `stop` that matches no column
    /// does not bound the scan.
    pub fn range<'a, Q>(&'a self, start: Option<&Q>, stop: Option<&'a Q>) -> Range<'a, C, V, Q>
    where
        C: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.range_with(start, stop, SlicePolicy::ExactStop)
    }

    /// Slice with an explicit stop policy
    pub fn range_with<'a, Q>(
        &'a self,
        start: Option<&Q>,
        stop: Option<&'a Q>,
        policy: SlicePolicy,
    ) -> Range<'a, C, V, Q>
    where
        C: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let lower = match start {
            Some(start) => Bound::Included(start),
            None => Bound::Unbounded,
        };

        match (policy, stop) {
            (SlicePolicy::ExactStop, stop) | (SlicePolicy::UpperBound, stop @ None) => Range {
                inner: Some(self.entries.range::<Q, _>((lower, Bound::Unbounded))),
                sentinel: stop,
                finished: false,
            },
            (SlicePolicy::UpperBound, Some(stop)) => {
                // BTreeMap::range panics on inverted bounds
                let inverted = matches!(start, Some(start) if start > stop);
                Range {
                    inner: (!inverted)
                        .then(|| self.entries.range::<Q, _>((lower, Bound::Included(stop)))),
                    sentinel: None,
                    finished: false,
                }
            }
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Ord, V> Default for ColumnIndex<C, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Ord, V> FromIterator<(C, V)> for ColumnIndex<C, V> {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, C, V> IntoIterator for &'a ColumnIndex<C, V> {
    type Item = (&'a C, &'a V);
    type IntoIter = btree_map::Iter<'a, C, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Iterator over a slice of a ColumnIndex
pub struct Range<'a, C, V, Q: ?Sized> {
    /// `None` when the bounds select nothing
    inner: Option<btree_map::Range<'a, C, V>>,
    /// Column that ends the scan once it has been yielded
    sentinel: Option<&'a Q>,
    finished: bool,
}

impl<'a, C, V, Q> Iterator for Range<'a, C, V, Q>
where
    C: Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Item = (&'a C, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some((column, value)) = self.inner.as_mut()?.next() else {
            self.finished = true;
            return None;
        };

        if let Some(stop) = self.sentinel {
            if <C as Borrow<Q>>::borrow(column) == stop {
                self.finished = true;
            }
        }

        Some((column, value))
    }
}

impl<'a, C, V, Q> FusedIterator for Range<'a, C, V, Q>
where
    C: Borrow<Q>,
    Q: Ord + ?Sized,
{
}
