//! Unit tests for isomorphism search.

use grafo_test_support::fixtures::GraphFixture;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{
    Attributes,
    error::AlgorithmErrorCode,
    test_utils::{arb_undirected, directed, graph_from, id, suite_proptest_config, undirected},
};

fn fixture(fixture: &GraphFixture) -> Graph {
    graph_from(fixture, false)
}

fn preserves_edges(pattern: &Graph, target: &Graph, mapping: &VertexMapping) -> bool {
    pattern
        .edges()
        .all(|edge| target.has_edge(&mapping[edge.source()], &mapping[edge.target()]))
}

#[rstest]
#[case::triangle_in_k4(GraphFixture::complete(3), GraphFixture::complete(4), 24)]
#[case::path_in_square(GraphFixture::path(3), GraphFixture::cycle(4), 8)]
#[case::triangle_in_pentagon(GraphFixture::complete(3), GraphFixture::cycle(5), 0)]
#[case::k4_in_triangle(GraphFixture::complete(4), GraphFixture::complete(3), 0)]
fn counts_every_embedding(
    #[case] pattern: GraphFixture,
    #[case] target: GraphFixture,
    #[case] expected: usize,
) {
    let (pattern, target) = (fixture(&pattern), fixture(&target));
    let mappings = enumerate_subgraph_isomorphisms(&pattern, &target, None, SearchBudget::default())
        .expect("within budget");
    assert_eq!(mappings.len(), expected);
    assert!(mappings.iter().all(|mapping| preserves_edges(&pattern, &target, mapping)));
}

#[rstest]
fn cap_limits_the_enumeration() {
    let pattern = fixture(&GraphFixture::complete(3));
    let target = fixture(&GraphFixture::complete(5));
    let mappings =
        enumerate_subgraph_isomorphisms(&pattern, &target, Some(3), SearchBudget::default())
            .expect("within budget");
    assert_eq!(mappings.len(), 3);
    let none = enumerate_subgraph_isomorphisms(&pattern, &target, Some(0), SearchBudget::default())
        .expect("within budget");
    assert!(none.is_empty());
}

#[rstest]
fn directed_patterns_respect_orientation() {
    let arc = directed(&[("u", "v")]);
    let cycle = directed(&[("a", "b"), ("b", "c"), ("c", "a")]);
    let mappings = enumerate_subgraph_isomorphisms(&arc, &cycle, None, SearchBudget::default())
        .expect("within budget");
    assert_eq!(mappings.len(), 3);
    let first = &mappings[0];
    assert!(cycle.has_edge(&first[&id("u")], &first[&id("v")]));

    let two_out = directed(&[("x", "y"), ("x", "z")]);
    assert!(
        find_subgraph_isomorphism(&two_out, &cycle, SearchBudget::default())
            .expect("within budget")
            .is_none()
    );
}

#[rstest]
fn mixed_directedness_is_rejected() {
    let err = find_subgraph_isomorphism(
        &directed(&[("a", "b")]),
        &undirected(&[("a", "b")]),
        SearchBudget::default(),
    )
    .expect_err("mixed graphs");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidParameter);
}

#[rstest]
fn self_loops_must_map_to_self_loops() {
    let looped = undirected(&[("p", "p")]);
    let plain = undirected(&[("a", "b")]);
    let target = undirected(&[("a", "b"), ("b", "b")]);
    assert!(
        find_subgraph_isomorphism(&looped, &plain, SearchBudget::default())
            .expect("within budget")
            .is_none()
    );
    let mapping = find_subgraph_isomorphism(&looped, &target, SearchBudget::default())
        .expect("within budget")
        .expect("loop embeds");
    assert_eq!(mapping[&id("p")], id("b"));
}

#[rstest]
fn empty_pattern_has_one_empty_embedding() {
    let pattern = crate::Graph::undirected("nothing");
    let target = fixture(&GraphFixture::cycle(3));
    let mappings = enumerate_subgraph_isomorphisms(&pattern, &target, None, SearchBudget::default())
        .expect("within budget");
    assert_eq!(mappings, vec![VertexMapping::new()]);
}

#[rstest]
fn exhausted_budget_is_an_error() {
    // The Petersen graph has girth 5, so every triangle attempt dead-ends.
    let pattern = fixture(&GraphFixture::complete(3));
    let target = fixture(&GraphFixture::petersen());
    let err = find_subgraph_isomorphism(&pattern, &target, SearchBudget::nodes(1))
        .expect_err("budget too small");
    assert_eq!(err.code(), AlgorithmErrorCode::SearchBudgetExceeded);
    assert!(
        find_subgraph_isomorphism(&pattern, &target, SearchBudget::default())
            .expect("within budget")
            .is_none()
    );
}

#[rstest]
fn relabelled_cycle_is_isomorphic() {
    let numbered = fixture(&GraphFixture::cycle(5));
    let named = undirected(&[("a", "c"), ("c", "e"), ("e", "b"), ("b", "d"), ("d", "a")]);
    let mapping = find_isomorphism(&numbered, &named, SearchBudget::default())
        .expect("within budget")
        .expect("both are 5-cycles");
    assert_eq!(mapping.len(), 5);
    assert!(preserves_edges(&numbered, &named, &mapping));
}

#[rstest]
fn equal_degree_sequences_are_not_enough() {
    let hexagon = fixture(&GraphFixture::cycle(6));
    let triangles = undirected(&[
        ("a", "b"),
        ("b", "c"),
        ("c", "a"),
        ("x", "y"),
        ("y", "z"),
        ("z", "x"),
    ]);
    assert!(!are_isomorphic(&hexagon, &triangles, SearchBudget::default()).expect("within budget"));
}

#[rstest]
#[case::vertex_count(GraphFixture::path(3), GraphFixture::path(4))]
#[case::edge_count(GraphFixture::path(4), GraphFixture::cycle(4))]
#[case::degrees(GraphFixture::path(4), GraphFixture::star(3))]
fn invariant_mismatches_short_circuit(#[case] left: GraphFixture, #[case] right: GraphFixture) {
    // A zero-node budget proves no search ran.
    let verdict = are_isomorphic(&fixture(&left), &fixture(&right), SearchBudget::nodes(0));
    assert_eq!(verdict, Ok(false));
}

#[rstest]
fn petersen_is_isomorphic_to_itself() {
    let petersen = fixture(&GraphFixture::petersen());
    let mut copy = crate::Graph::undirected("copy");
    let mut reversed: Vec<VertexId> = petersen.vertices().cloned().collect();
    reversed.reverse();
    for vertex in reversed {
        copy.add_vertex(vertex, Attributes::new()).expect("new vertex");
    }
    for edge in petersen.edges() {
        copy.add_edge(edge.target().clone(), edge.source().clone(), 1.0, Attributes::new())
            .expect("valid edge");
    }
    assert!(are_isomorphic(&petersen, &copy, SearchBudget::default()).expect("within budget"));
}

fn relabel(graph: &Graph, permutation: &[usize]) -> Graph {
    let position = |vertex: &VertexId| {
        graph
            .vertices()
            .position(|candidate| candidate == vertex)
            .expect("vertex exists")
    };
    let renamed = |vertex: &VertexId| format!("v{}", permutation[position(vertex)]);
    let mut copy = crate::Graph::undirected("permuted");
    for vertex in graph.vertices() {
        copy.add_vertex(renamed(vertex), Attributes::new()).expect("new vertex");
    }
    for edge in graph.edges() {
        copy.add_edge(renamed(edge.source()), renamed(edge.target()), 1.0, Attributes::new())
            .expect("valid edge");
    }
    copy
}

fn graph_and_permutation() -> impl Strategy<Value = (Graph, Vec<usize>)> {
    arb_undirected(6).prop_flat_map(|graph| {
        let n = graph.vertex_count();
        (Just(graph), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    })
}

proptest! {
    #![proptest_config(suite_proptest_config(48))]

    #[test]
    fn permuted_graphs_are_isomorphic((graph, permutation) in graph_and_permutation()) {
        let copy = relabel(&graph, &permutation);
        let mapping = find_isomorphism(&graph, &copy, SearchBudget::default())
            .expect("within budget");
        prop_assert!(mapping.is_some());
        if let Some(mapping) = mapping {
            prop_assert!(preserves_edges(&graph, &copy, &mapping));
        }
    }
}
