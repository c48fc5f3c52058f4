use rowgraph::assembly::{build_block_graph, build_graph, build_graph_sequential, divide_in_partitions, AssemblyOptions};
use rowgraph::{GraphConfig, IndexType, SparseRowGraph};

const N_DOFS: usize = 40;

/// Tetrahedral element connectivities over 40 DOFs
fn element_connectivities() -> Vec<[IndexType; 4]> {
    vec![
        [19, 11, 7, 39],
        [33, 27, 22, 9],
        [11, 2, 3, 6],
        [8, 26, 3, 22],
        [0, 26, 5, 31],
        [1, 18, 35, 12],
        [3, 36, 23, 7],
        [16, 8, 18, 15],
        [16, 33, 10, 26],
        [25, 2, 18, 31],
        [33, 26, 4, 6],
        [19, 21, 22, 7],
        [9, 37, 29, 14],
        [18, 19, 14, 39],
        [24, 34, 37, 7],
        [16, 9, 29, 14],
        [17, 18, 11, 4],
        [16, 33, 28, 37],
        [37, 26, 11, 5],
        [8, 26, 35, 14],
        [24, 4, 30, 15],
        [16, 17, 12, 6],
        [32, 25, 35, 28],
        [24, 25, 14, 1],
        [24, 35, 5, 6],
        [28, 12, 38, 15],
        [8, 18, 35, 6],
        [28, 31, 22, 39],
        [1, 28, 13, 7],
        [17, 10, 36, 7],
        [25, 14, 30, 9],
    ]
}

#[test]
fn test_reference_mesh_pattern() {
    let elements = element_connectivities();
    let graph = build_graph(N_DOFS, &elements, &AssemblyOptions::default());

    assert_eq!(graph.nnz(), 379);

    let csr = graph.export_csr();
    assert!(csr.validate().is_ok());
    assert_eq!(csr.row(0), &[0, 5, 26, 31]);
    assert_eq!(
        csr.row(7),
        &[1, 3, 7, 10, 11, 13, 17, 19, 21, 22, 23, 24, 28, 34, 36, 37, 39]
    );
    assert_eq!(csr.row(13), &[1, 7, 13, 28]);
    // DOF 20 belongs to no element
    assert!(csr.row(20).is_empty());
    assert_eq!(&csr.row_indices[..8], &[0, 4, 14, 21, 31, 41, 50, 65]);

    // Element cliques give a symmetric pattern with every used DOF on the diagonal
    assert!(graph.is_symmetric());
    assert_eq!(graph.diagonal_len(), N_DOFS - 1);
}

#[test]
fn test_every_element_block_is_present() {
    let elements = element_connectivities();
    let graph = build_graph(N_DOFS, &elements, &AssemblyOptions::default());

    for element in &elements {
        for &i in element {
            for &j in element {
                assert!(graph.has(i, j), "missing ({}, {})", i, j);
            }
        }
    }
}

#[test]
fn test_result_independent_of_partitioning() {
    let elements = element_connectivities();
    let reference = build_graph_sequential(N_DOFS, &elements, GraphConfig::default());

    for n_partitions in 1..=8 {
        let options = AssemblyOptions {
            n_partitions,
            ..AssemblyOptions::default()
        };
        let graph = build_graph(N_DOFS, &elements, &options);
        assert_eq!(graph, reference, "{} partitions", n_partitions);
    }
}

#[test]
fn test_manual_build_then_merge() {
    // Each "worker" owns a private graph over its element range
    let elements = element_connectivities();
    let bounds = divide_in_partitions(elements.len(), 3);

    let partials: Vec<SparseRowGraph> = bounds
        .windows(2)
        .map(|range| {
            let mut partial = SparseRowGraph::new(N_DOFS);
            for element in &elements[range[0]..range[1]] {
                partial.add_clique(element);
            }
            partial
        })
        .collect();

    let mut merged = SparseRowGraph::new(N_DOFS);
    for partial in &partials {
        merged.add_graph(partial);
    }
    merged.finalize();

    assert_eq!(merged.nnz(), 379);
    assert_eq!(
        merged.export_csr(),
        build_graph_sequential(N_DOFS, &elements, GraphConfig::default()).export_csr()
    );
}

#[test]
fn test_block_graph_scales_pattern() {
    let elements = element_connectivities();
    let scalar = build_graph(N_DOFS, &elements, &AssemblyOptions::default());
    let vector = build_block_graph(N_DOFS, 3, &elements, &AssemblyOptions::default());

    assert_eq!(vector.size(), 3 * N_DOFS);
    assert_eq!(vector.nnz(), 9 * scalar.nnz());
    for node in 0..N_DOFS {
        for d in 0..3 {
            assert_eq!(vector.row_len(3 * node + d), 3 * scalar.row_len(node));
        }
    }
}
