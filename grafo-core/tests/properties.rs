//! Cross-family properties of well-known graphs.

mod common;

use grafo_core::{
    SearchBudget, VertexId,
    centrality::degree_centrality,
    cliques::maximal_cliques,
    coloring::{chromatic_number_upper_bound, is_k_colorable},
    planarity::{KuratowskiKind, Planarity, check_planarity},
    spectral::algebraic_connectivity,
};
use grafo_test_support::fixtures::GraphFixture;
use rstest::rstest;

#[rstest]
fn four_cycle_invariants() {
    let graph = common::build(&GraphFixture::cycle(4), false);

    let scores = degree_centrality(&graph);
    for (_, score) in scores.iter() {
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
    }
    let connectivity = algebraic_connectivity(&graph).expect("connected");
    assert!((connectivity - 2.0).abs() < 1e-9);
    let estimate = chromatic_number_upper_bound(&graph).expect("loop-free");
    assert_eq!(estimate.upper_bound, 2);
    assert!(matches!(check_planarity(&graph), Planarity::Planar(_)));
}

#[rstest]
fn k5_invariants() {
    let graph = common::build(&GraphFixture::complete(5), false);

    let cliques = maximal_cliques(&graph, SearchBudget::default()).expect("within budget");
    assert_eq!(cliques.len(), 1);
    assert_eq!(cliques[0].len(), 5);

    let estimate = chromatic_number_upper_bound(&graph).expect("loop-free");
    assert_eq!(estimate.upper_bound, 5);
    assert!(
        is_k_colorable(&graph, 4, SearchBudget::default())
            .expect("within budget")
            .is_none()
    );

    let Planarity::NonPlanar(witness) = check_planarity(&graph) else {
        panic!("K5 is not planar");
    };
    assert_eq!(witness.kind, KuratowskiKind::K5);
    assert_eq!(witness.edges.len(), 10);
    let all: Vec<VertexId> = graph.vertices().cloned().collect();
    assert_eq!(witness.branch_vertices, all);
}

#[rstest]
fn petersen_hides_a_k33_subdivision() {
    let graph = common::build(&GraphFixture::petersen(), false);
    let Planarity::NonPlanar(witness) = check_planarity(&graph) else {
        panic!("the Petersen graph is not planar");
    };
    assert_eq!(witness.kind, KuratowskiKind::K33);
    assert_eq!(witness.branch_vertices.len(), 6);
    for (a, b) in &witness.edges {
        assert!(graph.has_edge(a, b));
    }
}
