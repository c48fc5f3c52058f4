//! Parallel sparsity pattern assembly
//!
//! Builds the global graph from element index lists under the
//! build-then-merge discipline: every worker fills a private graph of the
//! full size with its share of the elements, and the partial graphs are
//! merged one after another once the parallel region has ended. No graph is
//! ever mutated by two threads.
//!
//! # Example
//!
//! ```
//! use rowgraph::assembly::{build_graph, AssemblyOptions};
//!
//! let elements = vec![vec![0, 1, 2], vec![1, 2, 3]];
//! let graph = build_graph(4, &elements, &AssemblyOptions::default());
//! assert!(graph.has(0, 2));
//! assert!(!graph.has(0, 3));
//! ```

pub mod partition;

pub use partition::divide_in_partitions;

use crate::config::GraphConfig;
use crate::graph::{IndexType, SparseRowGraph};
use rayon::prelude::*;
use tracing::debug;

/// Assembly options
#[derive(Debug, Clone, Default)]
pub struct AssemblyOptions {
    /// Number of private partial graphs (0 = one per rayon thread)
    pub n_partitions: usize,
    /// Configuration of the partial and the resulting graphs
    pub graph_config: GraphConfig,
}

impl AssemblyOptions {
    fn partitions(&self) -> usize {
        if self.n_partitions == 0 {
            rayon::current_num_threads()
        } else {
            self.n_partitions
        }
    }
}

/// Build the graph of `size` rows from element index lists, registering one
/// clique per element.
///
/// The result does not depend on the number of partitions.
pub fn build_graph<E>(size: IndexType, elements: &[E], options: &AssemblyOptions) -> SparseRowGraph
where
    E: AsRef<[IndexType]> + Sync,
{
    let config = options.graph_config;
    let bounds = divide_in_partitions(elements.len(), options.partitions());

    let partials: Vec<SparseRowGraph> = bounds
        .par_windows(2)
        .filter(|range| range[0] < range[1])
        .map(|range| {
            let mut partial = SparseRowGraph::with_config(size, config);
            for element in &elements[range[0]..range[1]] {
                partial.add_clique(element.as_ref());
            }
            partial
        })
        .collect();

    debug!(
        "Built {} partial graphs from {} elements",
        partials.len(),
        elements.len()
    );

    let mut partials = partials.into_iter();
    let mut graph = partials
        .next()
        .unwrap_or_else(|| SparseRowGraph::with_config(size, config));
    for partial in partials {
        graph.add_graph(&partial);
    }
    graph.finalize();
    graph
}

/// Single-threaded reference path
pub fn build_graph_sequential<E>(size: IndexType, elements: &[E], config: GraphConfig) -> SparseRowGraph
where
    E: AsRef<[IndexType]>,
{
    let mut graph = SparseRowGraph::with_config(size, config);
    for element in elements {
        graph.add_clique(element.as_ref());
    }
    graph.finalize();
    graph
}

/// Expand node connectivity to DOF indices, `node * dofs_per_node + d`
pub fn element_dofs(nodes: &[IndexType], dofs_per_node: usize) -> Vec<IndexType> {
    nodes
        .iter()
        .flat_map(|&node| (0..dofs_per_node).map(move |d| node * dofs_per_node + d))
        .collect()
}

/// Build the DOF graph of a mesh with `n_nodes` nodes and `dofs_per_node`
/// unknowns per node from element node lists.
pub fn build_block_graph<E>(
    n_nodes: usize,
    dofs_per_node: usize,
    elements: &[E],
    options: &AssemblyOptions,
) -> SparseRowGraph
where
    E: AsRef<[IndexType]> + Sync,
{
    let dof_lists: Vec<Vec<IndexType>> = elements
        .par_iter()
        .map(|element| element_dofs(element.as_ref(), dofs_per_node))
        .collect();

    build_graph(n_nodes * dofs_per_node, &dof_lists, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(n_elements: usize) -> Vec<Vec<IndexType>> {
        // 1D chain of two-node elements
        (0..n_elements).map(|e| vec![e, e + 1]).collect()
    }

    #[test]
    fn test_build_matches_sequential() {
        let elements = strip(20);
        let sequential = build_graph_sequential(21, &elements, GraphConfig::default());

        for n_partitions in [1, 2, 3, 7, 20, 64] {
            let options = AssemblyOptions {
                n_partitions,
                ..AssemblyOptions::default()
            };
            assert_eq!(build_graph(21, &elements, &options), sequential);
        }
    }

    #[test]
    fn test_tridiagonal_pattern() {
        let graph = build_graph(6, &strip(5), &AssemblyOptions::default());
        let csr = graph.export_csr();
        assert_eq!(csr.row_indices, vec![0, 2, 5, 8, 11, 14, 16]);
        assert_eq!(csr.row(0), &[0, 1]);
        assert_eq!(csr.row(3), &[2, 3, 4]);
        assert_eq!(csr.row(5), &[4, 5]);
    }

    #[test]
    fn test_no_elements() {
        let elements: Vec<Vec<IndexType>> = Vec::new();
        let graph = build_graph(3, &elements, &AssemblyOptions::default());
        assert_eq!(graph.size(), 3);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_element_dofs() {
        assert_eq!(element_dofs(&[2, 0], 3), vec![6, 7, 8, 0, 1, 2]);
        assert_eq!(element_dofs(&[4], 1), vec![4]);
    }

    #[test]
    fn test_block_graph() {
        // Two bar elements sharing node 1, two DOFs per node
        let elements = vec![[0, 1], [1, 2]];
        let graph = build_block_graph(3, 2, &elements, &AssemblyOptions::default());

        assert_eq!(graph.size(), 6);
        // DOFs of node 1 couple with every DOF
        assert_eq!(graph.row_len(2), 6);
        assert_eq!(graph.row_len(3), 6);
        // End nodes only see their own element
        assert_eq!(graph.row_len(0), 4);
        assert!(!graph.has(0, 5));
    }

    #[test]
    fn test_options_config_propagates() {
        let options = AssemblyOptions {
            n_partitions: 2,
            graph_config: GraphConfig::default().checked(),
        };
        let graph = build_graph(3, &strip(2), &options);
        assert_eq!(graph.config(), &options.graph_config);
    }
}
