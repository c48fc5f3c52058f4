//! Row iteration over a sparse row graph

use super::types::{IndexType, RowSet};
use std::iter::FusedIterator;

/// Forward iterator over `(row_index, columns)` in ascending row order.
///
/// Obtained from [`SparseRowGraph::iter`](super::SparseRowGraph::iter);
/// calling `iter()` again starts a fresh pass.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    rows: &'a [RowSet],
    position: IndexType,
}

impl<'a> Rows<'a> {
    pub(super) fn new(rows: &'a [RowSet]) -> Self {
        Self { rows, position: 0 }
    }

    /// Index of the row the cursor points at, i.e. the row the next call
    /// to `next()` yields. Equals the graph size once exhausted.
    pub fn row_index(&self) -> IndexType {
        self.position
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = (IndexType, &'a RowSet);

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.get(self.position)?;
        let index = self.position;
        self.position += 1;
        Some((index, row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl FusedIterator for Rows<'_> {}
