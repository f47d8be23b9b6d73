//! Unit tests for spectral analysis.

use grafo_test_support::fixtures::GraphFixture;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{
    error::AlgorithmErrorCode,
    test_utils::{arb_undirected, directed, graph_from, int, suite_proptest_config},
};

fn assert_spectrum(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
    }
}

#[rstest]
#[case::path(GraphFixture::path(3), &[0.0, 1.0, 3.0])]
#[case::complete(GraphFixture::complete(4), &[0.0, 4.0, 4.0, 4.0])]
#[case::cycle(GraphFixture::cycle(4), &[0.0, 2.0, 2.0, 4.0])]
#[case::star(GraphFixture::star(3), &[0.0, 1.0, 1.0, 4.0])]
fn known_laplacian_spectra(#[case] fixture: GraphFixture, #[case] expected: &[f64]) {
    let graph = graph_from(&fixture, false);
    assert_spectrum(&laplacian_spectrum(&graph), expected);
}

#[rstest]
fn directed_edges_are_symmetrized() {
    let forward = directed(&[("a", "b"), ("b", "c")]);
    assert_spectrum(&laplacian_spectrum(&forward), &[0.0, 1.0, 3.0]);
}

#[rstest]
fn fiedler_value_is_zero_only_when_disconnected() {
    let connected = graph_from(&GraphFixture::path(4), false);
    assert!(algebraic_connectivity(&connected).expect("non-empty") > 0.0);
    let mut split = graph_from(&GraphFixture::two_cliques(3), false);
    split.remove_edge(&int(2), &int(3)).expect("bridge exists");
    assert_eq!(algebraic_connectivity(&split).expect("non-empty"), 0.0);
    assert_eq!(spectral_component_count(&split), 2);
}

#[rstest]
fn single_vertex_has_zero_connectivity() {
    let graph = graph_from(&GraphFixture::path(1), false);
    assert_eq!(algebraic_connectivity(&graph).expect("non-empty"), 0.0);
}

#[rstest]
fn empty_graph_has_no_fiedler_value() {
    let graph = crate::Graph::undirected("empty");
    assert!(laplacian_spectrum(&graph).is_empty());
    assert_eq!(
        algebraic_connectivity(&graph).expect_err("empty").code(),
        AlgorithmErrorCode::EmptyGraph
    );
}

#[rstest]
fn normalized_spectrum_of_complete_graph() {
    let graph = graph_from(&GraphFixture::complete(3), false);
    assert_spectrum(&normalized_laplacian_spectrum(&graph), &[0.0, 1.5, 1.5]);
}

#[rstest]
fn isolated_vertices_add_zero_normalized_eigenvalues() {
    let mut graph = graph_from(&GraphFixture::path(2), false);
    graph.add_vertex(7, crate::Attributes::new()).expect("new vertex");
    assert_spectrum(&normalized_laplacian_spectrum(&graph), &[0.0, 0.0, 2.0]);
}

#[rstest]
fn energy_of_complete_graph() {
    // K_n has eigenvalues n-1 and -1 (n-1 times).
    let graph = graph_from(&GraphFixture::complete(4), false);
    assert!((spectral_energy(&graph) - 6.0).abs() < 1e-9);
    assert_spectrum(&adjacency_spectrum(&graph), &[-1.0, -1.0, -1.0, 3.0]);
}

#[rstest]
fn spectral_distance_pads_smaller_graphs() {
    let small = graph_from(&GraphFixture::path(2), false);
    let mut padded = graph_from(&GraphFixture::path(2), false);
    padded.add_vertex(9, crate::Attributes::new()).expect("new vertex");
    assert!(spectral_distance(&small, &padded).abs() < 1e-9);
    let triangle = graph_from(&GraphFixture::complete(3), false);
    let path = graph_from(&GraphFixture::path(3), false);
    let expected = ((3.0_f64 - 1.0).powi(2) + (3.0_f64 - 3.0).powi(2)).sqrt();
    assert!((spectral_distance(&triangle, &path) - expected).abs() < 1e-9);
}

#[rstest]
fn spectral_clustering_recovers_barbell_halves() {
    let graph = graph_from(&GraphFixture::barbell(), false);
    let partition = spectral_clustering(&graph, 2, SpectralConfig::default()).expect("valid k");
    assert_eq!(partition.communities(), vec![
        vec![int(0), int(1), int(2)],
        vec![int(3), int(4), int(5)],
    ]);
}

#[rstest]
#[case::zero(0)]
#[case::too_many(7)]
fn spectral_clustering_rejects_bad_k(#[case] k: usize) {
    let graph = graph_from(&GraphFixture::barbell(), false);
    let err = spectral_clustering(&graph, k, SpectralConfig::default()).expect_err("bad k");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidParameter);
}

#[rstest]
fn spectral_communities_pick_the_best_modularity() {
    let graph = graph_from(&GraphFixture::two_cliques(4), false);
    let detected = spectral_communities(&graph, SpectralConfig::default()).expect("valid graph");
    assert_eq!(detected.partition.community_count(), 2);
    assert_eq!(detected.levels.len(), 3);
    assert!(detected.levels.iter().all(|level| level.modularity <= detected.modularity));
}

#[rstest]
fn tiny_graphs_form_one_spectral_community() {
    let graph = graph_from(&GraphFixture::path(3), false);
    let detected = spectral_communities(&graph, SpectralConfig::default()).expect("valid graph");
    assert_eq!(detected.partition.community_count(), 1);
    assert!(detected.levels.is_empty());
}

proptest! {
    #![proptest_config(suite_proptest_config(48))]

    #[test]
    fn laplacian_spectrum_is_non_negative_and_starts_at_zero(graph in arb_undirected(10)) {
        let spectrum = laplacian_spectrum(&graph);
        prop_assert!(spectrum[0].abs() < 1e-9);
        prop_assert!(spectrum.iter().all(|value| *value > -1e-9));
    }

    #[test]
    fn zero_eigenvalues_count_components(graph in arb_undirected(10)) {
        prop_assert_eq!(spectral_component_count(&graph), graph.connected_components().len());
    }

    #[test]
    fn laplacian_trace_is_twice_the_edge_count(graph in arb_undirected(10)) {
        let trace: f64 = laplacian_spectrum(&graph).iter().sum();
        prop_assert!((trace - 2.0 * graph.edge_count() as f64).abs() < 1e-6);
    }
}
