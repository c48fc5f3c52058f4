//! Sparse row graph
//!
//! Stores the sparsity pattern of a square (or rectangular) matrix as one
//! column set per row, aimed at the fast construction of CSR arrays.
//!
//! The graph is NOT thread-safe for mutation: build one graph per worker and
//! merge them with [`SparseRowGraph::add_graph`] once the parallel region is
//! done (see [`crate::assembly`]). A finished graph can be shared read-only.

use super::iter::Rows;
use super::types::{Entry, IndexType, RowSet};
use crate::config::GraphConfig;
use rayon::prelude::*;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Index : {row} exceeds the graph size : {size}")]
    RowOutOfBounds { row: IndexType, size: IndexType },

    #[error("Graph size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: IndexType, found: IndexType },

    #[error("Invalid CSR arrays: {0}")]
    InvalidCsr(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Row-oriented sparsity pattern over the fixed index range `0..size`.
///
/// `rows.len()` is the graph size and never changes after construction.
/// Each row is a hash set, so repeated insertions are idempotent and
/// insertion order is unobservable until [`export_csr`](Self::export_csr)
/// imposes ascending column order.
#[derive(Debug, Clone)]
pub struct SparseRowGraph {
    /// One column set per row
    pub(super) rows: Vec<RowSet>,
    /// Checking and parallelism settings; not part of the pattern
    config: GraphConfig,
}

impl SparseRowGraph {
    /// Create a graph with `size` empty rows and the default configuration
    pub fn new(size: IndexType) -> Self {
        Self::with_config(size, GraphConfig::default())
    }

    /// Create a graph with `size` empty rows
    pub fn with_config(size: IndexType, config: GraphConfig) -> Self {
        let rows = (0..size)
            .map(|_| RowSet::with_capacity_and_hasher(config.row_capacity, Default::default()))
            .collect();
        Self { rows, config }
    }

    /// Wrap rows that were decoded elsewhere; the size is `rows.len()`
    pub(crate) fn from_rows(rows: Vec<RowSet>, config: GraphConfig) -> Self {
        Self { rows, config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Number of rows
    #[inline]
    pub fn size(&self) -> IndexType {
        self.rows.len()
    }

    #[inline]
    fn check_row(&self, row: IndexType) {
        if self.config.bounds_check.enabled() {
            assert!(
                row < self.rows.len(),
                "Index : {} exceeds the graph size : {}",
                row,
                self.rows.len()
            );
        }
    }

    /// Whether `col` has been registered in `row`
    pub fn has(&self, row: IndexType, col: IndexType) -> bool {
        self.check_row(row);
        self.rows[row].contains(&col)
    }

    /// Column set of a row
    pub fn row(&self, row: IndexType) -> &RowSet {
        self.check_row(row);
        &self.rows[row]
    }

    /// Always-checked row access, for indices from untrusted input
    pub fn try_row(&self, row: IndexType) -> GraphResult<&RowSet> {
        self.rows.get(row).ok_or(GraphError::RowOutOfBounds {
            row,
            size: self.size(),
        })
    }

    pub fn row_len(&self, row: IndexType) -> usize {
        self.row(row).len()
    }

    /// Identity in a contiguous graph; reserved for renumbering layers
    #[inline]
    pub fn local_index(&self, global_index: IndexType) -> IndexType {
        global_index
    }

    /// Identity in a contiguous graph; reserved for renumbering layers
    #[inline]
    pub fn global_index(&self, local_index: IndexType) -> IndexType {
        local_index
    }

    /// Register a single (row, col) position
    pub fn add_entry(&mut self, row: IndexType, col: IndexType) {
        self.check_row(row);
        self.rows[row].insert(col);
    }

    pub fn try_add_entry(&mut self, row: IndexType, col: IndexType) -> GraphResult<()> {
        let size = self.size();
        self.rows
            .get_mut(row)
            .ok_or(GraphError::RowOutOfBounds { row, size })?
            .insert(col);
        Ok(())
    }

    /// Register every column of `cols` in one row
    pub fn add_entries<I>(&mut self, row: IndexType, cols: I)
    where
        I: IntoIterator<Item = IndexType>,
    {
        self.check_row(row);
        self.rows[row].extend(cols);
    }

    /// Register the dense block `indices x indices`, i.e. one element's
    /// local-to-global index list.
    pub fn add_clique(&mut self, indices: &[IndexType]) {
        for &i in indices {
            self.check_row(i);
            self.rows[i].extend(indices.iter().copied());
        }
    }

    /// Row-by-row union with `other`, which must not have more rows than `self`
    pub fn add_graph(&mut self, other: &SparseRowGraph) {
        if self.config.bounds_check.enabled() {
            assert!(
                other.size() <= self.size(),
                "Merged graph size : {} exceeds the graph size : {}",
                other.size(),
                self.size()
            );
        }

        let n = other.size();
        if n >= self.config.parallel_threshold {
            self.rows[..n]
                .par_iter_mut()
                .zip(other.rows.par_iter())
                .for_each(|(dst, src)| dst.extend(src.iter().copied()));
        } else {
            for (dst, src) in self.rows[..n].iter_mut().zip(other.rows.iter()) {
                dst.extend(src.iter().copied());
            }
        }
        debug!("Merged graph of {} rows, nnz now {}", n, self.nnz());
    }

    pub fn try_add_graph(&mut self, other: &SparseRowGraph) -> GraphResult<()> {
        if other.size() > self.size() {
            return Err(GraphError::SizeMismatch {
                expected: self.size(),
                found: other.size(),
            });
        }
        self.add_graph(other);
        Ok(())
    }

    /// Empty every row; the size is kept
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
    }

    /// Post-processing hook. A contiguous graph needs none.
    pub fn finalize(&mut self) {}

    /// Total number of distinct entries
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }

    /// True when no entry has been registered (the size may be non-zero)
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    /// Rows in ascending index order
    pub fn iter(&self) -> Rows<'_> {
        Rows::new(&self.rows)
    }

    /// Every entry, row by row; column order within a row is unspecified
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.iter()
            .flat_map(|(row, cols)| cols.iter().map(move |&col| Entry::new(row, col)))
    }

    /// Number of registered diagonal positions (i, i)
    pub fn diagonal_len(&self) -> usize {
        self.entries().filter(Entry::is_diagonal).count()
    }

    /// True when every (i, j) has its mirror (j, i). Columns past the last
    /// row have no mirror, so rectangular patterns are never symmetric.
    pub fn is_symmetric(&self) -> bool {
        self.entries().all(|entry| {
            let mirror = entry.transposed();
            self.rows
                .get(mirror.row)
                .map_or(false, |cols| cols.contains(&mirror.col))
        })
    }
}

impl PartialEq for SparseRowGraph {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl Eq for SparseRowGraph {}

impl<'a> IntoIterator for &'a SparseRowGraph {
    type Item = (IndexType, &'a RowSet);
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for SparseRowGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SparseRowGraph(size={}, nnz={})", self.size(), self.nnz())
    }
}
