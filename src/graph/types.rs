//! Core type definitions for the sparse row graph

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row and column index type
pub type IndexType = usize;

/// Column set of a single row. Unordered; sorted only on CSR export.
pub type RowSet = FxHashSet<IndexType>;

/// A single (row, column) position of the sparsity pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Entry {
    pub row: IndexType,
    pub col: IndexType,
}

impl Entry {
    pub fn new(row: IndexType, col: IndexType) -> Self {
        Entry { row, col }
    }

    /// The mirrored position (col, row)
    pub fn transposed(&self) -> Self {
        Entry { row: self.col, col: self.row }
    }

    pub fn is_diagonal(&self) -> bool {
        self.row == self.col
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(IndexType, IndexType)> for Entry {
    fn from((row, col): (IndexType, IndexType)) -> Self {
        Entry { row, col }
    }
}
