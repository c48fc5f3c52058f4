//! Rowgraph
//!
//! Sparsity pattern construction for finite-element matrix assembly. A
//! [`SparseRowGraph`] accumulates the (row, column) positions touched by
//! element contributions, deduplicating as it goes, and compacts them into
//! CSR row-pointer / column-index arrays for sparse matrix constructors and
//! linear solvers.
//!
//! # Modules
//!
//! - [`graph`]: the row graph, its iterator and CSR export
//! - [`assembly`]: build-then-merge parallel construction from element lists
//! - [`persistence`]: versioned checkpoint snapshots
//! - [`config`]: bounds checking, parallel thresholds and snapshot options
//!
//! ## Example Usage
//!
//! ```rust
//! use rowgraph::SparseRowGraph;
//!
//! let mut graph = SparseRowGraph::new(5);
//!
//! // One element coupling DOFs 0, 2 and 4
//! graph.add_clique(&[0, 2, 4]);
//! graph.add_entry(1, 1);
//!
//! let csr = graph.export_csr();
//! assert_eq!(csr.row_indices, vec![0, 3, 4, 7, 7, 10]);
//! assert_eq!(csr.row(2), &[0, 2, 4]);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod assembly;
pub mod config;
pub mod graph;
pub mod persistence;

// Re-export main types for convenience
pub use graph::{
    CsrArrays, Entry, GraphError, GraphResult, IndexType, RowSet, Rows, SparseRowGraph,
};

pub use assembly::{build_graph, build_graph_sequential, AssemblyOptions};

pub use config::{BoundsCheck, ConfigError, ConfigResult, GraphConfig, SnapshotConfig};

pub use persistence::{PersistenceError, PersistenceResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
