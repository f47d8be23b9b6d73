//! Unit tests for bipartite matching.

use std::collections::HashSet;

use grafo_test_support::fixtures::GraphFixture;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{
    error::AlgorithmErrorCode,
    test_utils::{arb_bipartite, directed, graph_from, id, int, suite_proptest_config, undirected},
};

fn ids(names: &[&str]) -> Vec<VertexId> {
    names.iter().map(|name| id(name)).collect()
}

#[rstest]
fn complete_bipartite_graph_is_perfectly_matched() {
    let graph = graph_from(&GraphFixture::complete_bipartite(3, 3), false);
    let matching = hopcroft_karp(&graph, None).expect("bipartite");
    assert_eq!(matching.size, 3);
    let lefts: Vec<VertexId> = matching.pairs.iter().map(|pair| pair.left.clone()).collect();
    assert_eq!(lefts, vec![int(0), int(1), int(2)]);
}

#[rstest]
fn augmenting_paths_reassign_earlier_choices() {
    // Greedy would match a-x and leave b unmatched.
    let graph = undirected(&[("a", "x"), ("a", "y"), ("b", "x")]);
    let matching = hopcroft_karp(&graph, None).expect("bipartite");
    assert_eq!(matching.pairs, vec![
        MatchedPair {
            left: id("a"),
            right: id("y"),
        },
        MatchedPair {
            left: id("b"),
            right: id("x"),
        },
    ]);
    assert_eq!(matching.partner(&id("y")), Some(&id("a")));
    assert_eq!(matching.partner(&id("z")), None);
}

#[rstest]
fn declared_sides_choose_the_left_vertices() {
    let graph = undirected(&[("x", "a"), ("y", "a"), ("y", "b")]);
    let sides = Bipartition::new(ids(&["a", "b"]), ids(&["x", "y"]));
    let matching = hopcroft_karp(&graph, Some(&sides)).expect("valid split");
    assert_eq!(matching.size, 2);
    assert!(matching.pairs.iter().all(|pair| ["a", "b"].contains(&pair.left.to_string().as_str())));
}

#[rstest]
fn odd_cycle_is_not_bipartite() {
    let graph = graph_from(&GraphFixture::cycle(5), false);
    assert!(!is_bipartite(&graph));
    let err = hopcroft_karp(&graph, None).expect_err("odd cycle");
    assert_eq!(err.code(), AlgorithmErrorCode::NotBipartite);
}

#[rstest]
fn self_loop_is_not_bipartite() {
    let graph = undirected(&[("a", "b"), ("b", "b")]);
    let err = bipartition(&graph).expect_err("self-loop");
    assert_eq!(err, AlgorithmError::NotBipartite { vertex: id("b") });
}

#[rstest]
fn inferred_split_starts_each_component_on_the_left() {
    let graph = undirected(&[("a", "b"), ("c", "d"), ("d", "e")]);
    let split = bipartition(&graph).expect("bipartite");
    assert_eq!(split.left(), ids(&["a", "c", "e"]).as_slice());
    assert_eq!(split.right(), ids(&["b", "d"]).as_slice());
}

#[rstest]
fn directed_edges_are_matched_as_undirected() {
    let graph = directed(&[("x", "a"), ("b", "y")]);
    assert_eq!(hopcroft_karp(&graph, None).expect("bipartite").size, 2);
}

#[rstest]
#[case::overlap(&["a", "b"], &["b", "c"], "listed on both sides")]
#[case::repeated(&["a", "a"], &["b", "c"], "listed twice")]
#[case::uncovered(&["a"], &["b"], "on neither side")]
#[case::same_side_edge(&["a", "c"], &["b"], "stays on one side")]
fn malformed_bipartitions_are_rejected(
    #[case] left: &[&str],
    #[case] right: &[&str],
    #[case] reason: &str,
) {
    let graph = undirected(&[("a", "b"), ("b", "c"), ("a", "c")]);
    let sides = Bipartition::new(ids(left), ids(right));
    let err = sides.validate(&graph).expect_err("malformed split");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidBipartition);
    assert!(err.to_string().contains(reason), "{err}");
}

#[rstest]
fn unknown_declared_vertex_is_reported() {
    let graph = undirected(&[("a", "b")]);
    let sides = Bipartition::new(ids(&["a"]), ids(&["b", "ghost"]));
    let err = hopcroft_karp(&graph, Some(&sides)).expect_err("unknown vertex");
    assert_eq!(err, AlgorithmError::VertexNotFound { vertex: id("ghost") });
}

#[rstest]
fn edgeless_graph_has_empty_matching() {
    let mut graph = crate::Graph::undirected("isolated");
    graph.add_vertex("solo", crate::Attributes::new()).expect("new vertex");
    let matching = hopcroft_karp(&graph, None).expect("bipartite");
    assert_eq!(matching.size, 0);
    assert!(matching.pairs.is_empty());
}

/// Exhaustive maximum matching size for small graphs.
fn brute_force_size(graph: &Graph) -> usize {
    let edges: Vec<(VertexId, VertexId)> = graph
        .edges()
        .map(|edge| (edge.source().clone(), edge.target().clone()))
        .collect();
    let mut best = 0;
    let mut stack = vec![(0_usize, Vec::<&VertexId>::new())];
    while let Some((next, used)) = stack.pop() {
        best = best.max(used.len() / 2);
        for (offset, (s, t)) in edges[next..].iter().enumerate() {
            if !used.contains(&s) && !used.contains(&t) {
                let mut extended = used.clone();
                extended.extend([s, t]);
                stack.push((next + offset + 1, extended));
            }
        }
    }
    best
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn matching_is_valid_and_maximum((graph, left, right) in arb_bipartite(4)) {
        let matching = hopcroft_karp(&graph, None).expect("bipartite by construction");
        prop_assert_eq!(matching.size, matching.pairs.len());
        prop_assert!(matching.size <= left.min(right));
        let mut seen = HashSet::new();
        for pair in &matching.pairs {
            prop_assert!(graph.has_edge(&pair.left, &pair.right));
            prop_assert!(seen.insert(pair.left.clone()));
            prop_assert!(seen.insert(pair.right.clone()));
        }
        prop_assert_eq!(matching.size, brute_force_size(&graph));
    }
}
