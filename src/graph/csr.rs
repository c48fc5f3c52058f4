//! CSR export
//!
//! Compacts a [`SparseRowGraph`] into the classic row-pointer / column-index
//! arrays consumed by sparse matrix constructors and linear solvers. Columns
//! within each row come out in ascending order.

use super::row_graph::{GraphError, GraphResult, SparseRowGraph};
use super::types::{IndexType, RowSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compressed Sparse Row structure of a sparsity pattern (no values)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CsrArrays {
    /// Row pointers: row i spans `col_indices[row_indices[i]..row_indices[i + 1]]`.
    /// Size = nrows + 1
    pub row_indices: Vec<IndexType>,
    /// Column indices, sorted within each row
    pub col_indices: Vec<IndexType>,
}

impl CsrArrays {
    pub fn nrows(&self) -> usize {
        self.row_indices.len().saturating_sub(1)
    }

    pub fn nnz(&self) -> usize {
        self.col_indices.len()
    }

    /// Sorted columns of a row.
    ///
    /// Panics when `row >= nrows()`; use [`contains`](Self::contains) for
    /// unchecked indices.
    pub fn row(&self, row: IndexType) -> &[IndexType] {
        assert!(
            row < self.nrows(),
            "Index : {} exceeds the graph size : {}",
            row,
            self.nrows()
        );
        let start = self.row_indices[row];
        let end = self.row_indices[row + 1];
        &self.col_indices[start..end]
    }

    pub fn contains(&self, row: IndexType, col: IndexType) -> bool {
        row < self.nrows() && self.row(row).binary_search(&col).is_ok()
    }

    pub fn into_parts(self) -> (Vec<IndexType>, Vec<IndexType>) {
        (self.row_indices, self.col_indices)
    }

    /// Check the structural invariants: `row_indices` starts at 0, is
    /// non-decreasing and ends at `nnz`; every row is strictly ascending.
    pub fn validate(&self) -> GraphResult<()> {
        match self.row_indices.first() {
            None => return Err(GraphError::InvalidCsr("empty row pointer array".to_string())),
            Some(&first) if first != 0 => {
                return Err(GraphError::InvalidCsr(format!(
                    "row pointers start at {} instead of 0",
                    first
                )))
            }
            _ => {}
        }

        let last = self.row_indices[self.row_indices.len() - 1];
        if last != self.col_indices.len() {
            return Err(GraphError::InvalidCsr(format!(
                "last row pointer {} does not match {} column indices",
                last,
                self.col_indices.len()
            )));
        }

        for (i, bounds) in self.row_indices.windows(2).enumerate() {
            if bounds[1] < bounds[0] || bounds[1] > last {
                return Err(GraphError::InvalidCsr(format!(
                    "row pointers out of order at row {}",
                    i
                )));
            }
            if self.col_indices[bounds[0]..bounds[1]]
                .windows(2)
                .any(|pair| pair[0] >= pair[1])
            {
                return Err(GraphError::InvalidCsr(format!(
                    "columns of row {} are not strictly ascending",
                    i
                )));
            }
        }
        Ok(())
    }
}

impl SparseRowGraph {
    /// Export the pattern as CSR arrays with ascending columns per row
    pub fn export_csr(&self) -> CsrArrays {
        let mut csr = CsrArrays::default();
        self.export_csr_into(&mut csr.row_indices, &mut csr.col_indices);
        csr
    }

    /// Export into caller-owned buffers, reusing their allocations.
    /// Returns the number of rows written.
    pub fn export_csr_into(
        &self,
        row_indices: &mut Vec<IndexType>,
        col_indices: &mut Vec<IndexType>,
    ) -> IndexType {
        let nrows = self.size();

        row_indices.clear();
        row_indices.reserve(nrows + 1);
        row_indices.push(0);
        let mut running = 0;
        for row in &self.rows {
            running += row.len();
            row_indices.push(running);
        }

        col_indices.clear();
        col_indices.resize(running, 0);

        if nrows >= self.config().parallel_threshold {
            let slots = split_rows(col_indices, row_indices);
            self.rows
                .par_iter()
                .zip(slots.into_par_iter())
                .for_each(|(row, slot)| fill_sorted(row, slot));
        } else {
            for (row, bounds) in self.rows.iter().zip(row_indices.windows(2)) {
                fill_sorted(row, &mut col_indices[bounds[0]..bounds[1]]);
            }
        }

        debug!("Exported CSR arrays: {} rows, {} non-zeros", nrows, running);
        nrows
    }
}

/// Cut the column array into one disjoint slot per row
fn split_rows<'a>(
    col_indices: &'a mut [IndexType],
    row_indices: &[IndexType],
) -> Vec<&'a mut [IndexType]> {
    let mut slots = Vec::with_capacity(row_indices.len().saturating_sub(1));
    let mut rest = col_indices;
    for bounds in row_indices.windows(2) {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(bounds[1] - bounds[0]);
        slots.push(head);
        rest = tail;
    }
    slots
}

fn fill_sorted(row: &RowSet, slot: &mut [IndexType]) {
    for (dst, &col) in slot.iter_mut().zip(row.iter()) {
        *dst = col;
    }
    slot.sort_unstable();
}
