//! Unit tests for Eulerian walks and Hamiltonian cycles.

use std::collections::HashMap;

use grafo_test_support::fixtures::GraphFixture;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{
    error::AlgorithmErrorCode,
    test_utils::{arb_undirected, directed, graph_from, id, suite_proptest_config, undirected},
};

/// Counts each edge of the walk, keyed by unordered pair for undirected
/// graphs.
fn traversals(graph: &Graph, walk: &[VertexId]) -> HashMap<(VertexId, VertexId), usize> {
    let mut counts = HashMap::new();
    for pair in walk.windows(2) {
        let (a, b) = (pair[0].clone(), pair[1].clone());
        let key = if graph.is_directed() || a <= b { (a, b) } else { (b, a) };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn uses_every_edge_once(graph: &Graph, walk: &[VertexId]) -> bool {
    let counts = traversals(graph, walk);
    walk.len() == graph.edge_count() + 1
        && counts.values().all(|&count| count == 1)
        && graph.edges().all(|edge| {
            let (a, b) = (edge.source().clone(), edge.target().clone());
            let key = if graph.is_directed() || a <= b { (a, b) } else { (b, a) };
            counts.contains_key(&key)
        })
}

#[rstest]
#[case::square(undirected(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")]))]
#[case::bowtie(undirected(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "e"), ("e", "c")]))]
#[case::directed_loops(directed(&[("a", "b"), ("b", "a"), ("b", "c"), ("c", "b"), ("a", "a")]))]
#[case::undirected_loop(undirected(&[("a", "b"), ("b", "c"), ("c", "a"), ("b", "b")]))]
fn circuits_traverse_every_edge_once(#[case] graph: Graph) {
    assert_eq!(eulerian_kind(&graph), EulerianKind::Circuit);
    let walk = eulerian_circuit(&graph, None).expect("eulerian");
    assert_eq!(walk.first(), Some(&id("a")));
    assert_eq!(walk.first(), walk.last());
    assert!(uses_every_edge_once(&graph, &walk), "walk {walk:?}");
}

#[rstest]
fn circuit_honours_the_requested_start() {
    let graph = undirected(&[("a", "b"), ("b", "c"), ("c", "a")]);
    let walk = eulerian_circuit(&graph, Some(&id("c"))).expect("eulerian");
    assert_eq!(walk.first(), Some(&id("c")));
    assert_eq!(walk.last(), Some(&id("c")));
}

#[rstest]
fn isolated_start_is_rejected() {
    let mut graph = undirected(&[("a", "b"), ("b", "c"), ("c", "a")]);
    graph.add_vertex("z", crate::Attributes::new()).expect("new vertex");
    let err = eulerian_circuit(&graph, Some(&id("z"))).expect_err("no edges at z");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidParameter);
    let err = eulerian_circuit(&graph, Some(&id("q"))).expect_err("unknown vertex");
    assert_eq!(err.code(), AlgorithmErrorCode::VertexNotFound);
    // Isolated vertices do not break the circuit itself.
    assert_eq!(eulerian_circuit(&graph, None).expect("eulerian").len(), 4);
}

#[rstest]
fn odd_vertices_block_circuits_but_allow_paths() {
    let graph = undirected(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);
    assert_eq!(eulerian_kind(&graph), EulerianKind::Path);
    let err = eulerian_circuit(&graph, None).expect_err("c and d are odd");
    assert!(matches!(err, AlgorithmError::NotEulerian { ref vertex, .. } if *vertex == id("c")));

    let walk = eulerian_path(&graph).expect("semi-eulerian");
    assert_eq!(walk.first(), Some(&id("c")));
    assert_eq!(walk.last(), Some(&id("d")));
    assert!(uses_every_edge_once(&graph, &walk));
}

#[rstest]
fn directed_paths_start_at_the_surplus_vertex() {
    let graph = directed(&[("b", "c"), ("a", "b"), ("c", "a"), ("a", "d")]);
    assert_eq!(eulerian_kind(&graph), EulerianKind::Path);
    let walk = eulerian_path(&graph).expect("semi-eulerian");
    assert_eq!(walk.first(), Some(&id("a")));
    assert_eq!(walk.last(), Some(&id("d")));
    assert!(uses_every_edge_once(&graph, &walk));
}

#[rstest]
fn path_of_a_circuit_is_closed() {
    let graph = directed(&[("a", "b"), ("b", "c"), ("c", "a")]);
    let walk = eulerian_path(&graph).expect("eulerian");
    assert_eq!(walk, vec![id("a"), id("b"), id("c"), id("a")]);
}

#[rstest]
#[case::star(graph_from(&GraphFixture::star(3), false), 2)]
#[case::split(undirected(&[("a", "b"), ("b", "c"), ("c", "a"), ("x", "y"), ("y", "z"), ("z", "x")]), 3)]
#[case::unbalanced(directed(&[("a", "b"), ("a", "c"), ("a", "d")]), 0)]
#[case::two_sources(directed(&[("a", "b"), ("c", "b"), ("b", "d")]), 2)]
fn broken_graphs_name_the_offending_vertex(#[case] graph: Graph, #[case] offender: usize) {
    assert_eq!(eulerian_kind(&graph), EulerianKind::Neither);
    let expected = graph.vertices().nth(offender).expect("vertex exists").clone();
    for err in [
        eulerian_circuit(&graph, None).expect_err("not eulerian"),
        eulerian_path(&graph).expect_err("not eulerian"),
    ] {
        assert_eq!(err.code(), AlgorithmErrorCode::NotEulerian);
        assert!(matches!(err, AlgorithmError::NotEulerian { ref vertex, .. } if *vertex == expected));
    }
}

#[rstest]
fn edgeless_graphs_have_empty_walks() {
    let mut graph = Graph::undirected("points");
    graph.add_vertex(1, crate::Attributes::new()).expect("new vertex");
    assert_eq!(eulerian_kind(&graph), EulerianKind::Circuit);
    assert!(eulerian_circuit(&graph, None).expect("trivial").is_empty());
    assert!(eulerian_path(&graph).expect("trivial").is_empty());
}

#[rstest]
fn kind_serializes_in_snake_case() {
    let kinds = [EulerianKind::Circuit, EulerianKind::Path, EulerianKind::Neither];
    let value = serde_json::to_value(kinds).expect("serializable");
    assert_eq!(value, serde_json::json!(["circuit", "path", "none"]));
}

#[rstest]
#[case::cycle(GraphFixture::cycle(6), true)]
#[case::k4(GraphFixture::complete(4), true)]
#[case::k33(GraphFixture::complete_bipartite(3, 3), true)]
#[case::petersen(GraphFixture::petersen(), false)]
#[case::star(GraphFixture::star(4), false)]
#[case::path(GraphFixture::path(2), false)]
fn hamiltonian_cycles_are_found_or_refuted(#[case] fixture: GraphFixture, #[case] exists: bool) {
    let graph = graph_from(&fixture, false);
    let found = hamiltonian_cycle(&graph, SearchBudget::default()).expect("within budget");
    assert_eq!(found.is_some(), exists);
    if let Some(cycle) = found {
        assert_eq!(cycle.first(), Some(&VertexId::Int(0)));
        verify_hamiltonian_cycle(&graph, &cycle).expect("valid cycle");
    }
}

#[rstest]
fn directed_hamiltonian_cycles_follow_arcs() {
    let graph = directed(&[("a", "b"), ("b", "c"), ("c", "a"), ("a", "c")]);
    let cycle = hamiltonian_cycle(&graph, SearchBudget::default())
        .expect("within budget")
        .expect("a -> b -> c -> a");
    assert_eq!(cycle, vec![id("a"), id("b"), id("c"), id("a")]);
    let two_way = directed(&[("a", "b"), ("b", "a")]);
    assert!(
        hamiltonian_cycle(&two_way, SearchBudget::default())
            .expect("within budget")
            .is_some()
    );
}

#[rstest]
fn hamiltonian_search_respects_its_budget() {
    let graph = graph_from(&GraphFixture::petersen(), false);
    let err = hamiltonian_cycle(&graph, SearchBudget::nodes(5)).expect_err("budget too small");
    assert_eq!(err.code(), AlgorithmErrorCode::SearchBudgetExceeded);
    let err = hamiltonian_cycle(&Graph::undirected("empty"), SearchBudget::default())
        .expect_err("empty graph");
    assert_eq!(err.code(), AlgorithmErrorCode::EmptyGraph);
}

#[rstest]
#[case::repeated(&["a", "b", "a", "c", "a"], "a")]
#[case::open(&["a", "b", "c"], "c")]
#[case::missing_vertex(&["a", "b", "a"], "c")]
#[case::missing_edge(&["a", "c", "b", "d", "a"], "b")]
fn invalid_hamiltonian_cycles_are_explained(#[case] cycle: &[&str], #[case] offender: &str) {
    let graph = undirected(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a"), ("a", "c")]);
    let cycle: Vec<VertexId> = cycle.iter().map(|&name| id(name)).collect();
    let err = verify_hamiltonian_cycle(&graph, &cycle).expect_err("invalid cycle");
    assert!(
        matches!(err, AlgorithmError::InvalidSolution { ref vertex, .. } if *vertex == id(offender)),
        "{err}"
    );
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn walks_agree_with_classification(graph in arb_undirected(7)) {
        match eulerian_kind(&graph) {
            EulerianKind::Circuit => {
                let walk = eulerian_circuit(&graph, None).expect("circuit exists");
                prop_assert!(walk.is_empty() || uses_every_edge_once(&graph, &walk));
                prop_assert_eq!(walk.first(), walk.last());
            }
            EulerianKind::Path => {
                let walk = eulerian_path(&graph).expect("path exists");
                prop_assert!(uses_every_edge_once(&graph, &walk));
                prop_assert_ne!(walk.first(), walk.last());
            }
            EulerianKind::Neither => {
                prop_assert!(eulerian_path(&graph).is_err());
            }
        }
    }
}
