//! Sparse row graph
//!
//! This module implements the sparsity-pattern side of matrix assembly:
//! - Per-row column sets with idempotent insertion
//! - Clique insertion for element index lists
//! - Merging of per-worker partial graphs
//! - CSR export with ascending columns per row

pub mod csr;
pub mod iter;
pub mod row_graph;
pub mod types;

// Re-export main types
pub use csr::CsrArrays;
pub use iter::Rows;
pub use row_graph::{GraphError, GraphResult, SparseRowGraph};
pub use types::{Entry, IndexType, RowSet};
