//! Unit tests for community detection.

use grafo_test_support::fixtures::GraphFixture;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{
    convergence::IterationControl,
    error::AlgorithmErrorCode,
    test_utils::{arb_undirected, directed, graph_from, id, int, suite_proptest_config, undirected, weighted},
};

fn split(graph: &Graph, groups: &[&[i64]]) -> Partition {
    let communities: Vec<Vec<VertexId>> = groups
        .iter()
        .map(|group| group.iter().copied().map(int).collect())
        .collect();
    Partition::from_communities(graph, &communities).expect("valid partition")
}

#[rstest]
fn partition_ids_follow_natural_order() {
    let graph = undirected(&[("x", "y"), ("y", "z")]);
    let partition = Partition::from_communities(&graph, &[vec![id("z")], vec![id("y"), id("x")]])
        .expect("covers all vertices");
    assert_eq!(partition.community(&id("x")), Some(0));
    assert_eq!(partition.community(&id("z")), Some(1));
    assert_eq!(partition.communities(), vec![vec![id("x"), id("y")], vec![id("z")]]);
}

#[rstest]
#[case::missing(&[&["a"][..]][..], AlgorithmErrorCode::InvalidSolution)]
#[case::repeated(&[&["a", "b"][..], &["b"][..]][..], AlgorithmErrorCode::InvalidSolution)]
#[case::unknown(&[&["a", "b", "q"][..]][..], AlgorithmErrorCode::VertexNotFound)]
fn malformed_partitions_are_rejected(#[case] groups: &[&[&str]], #[case] expected: AlgorithmErrorCode) {
    let graph = undirected(&[("a", "b")]);
    let communities: Vec<Vec<VertexId>> = groups
        .iter()
        .map(|group| group.iter().map(|name| id(name)).collect())
        .collect();
    let err = Partition::from_communities(&graph, &communities).expect_err("malformed");
    assert_eq!(err.code(), expected);
}

#[rstest]
fn single_community_has_zero_modularity() {
    let graph = graph_from(&GraphFixture::cycle(6), false);
    let partition = split(&graph, &[&[0, 1, 2, 3, 4, 5]]);
    assert!(modularity(&graph, &partition).expect("valid").abs() < 1e-12);
}

#[rstest]
fn barbell_halves_score_expected_modularity() {
    let graph = graph_from(&GraphFixture::barbell(), false);
    let partition = split(&graph, &[&[0, 1, 2], &[3, 4, 5]]);
    let expected = 2.0 * (6.0 / 14.0 - 0.25);
    assert!((modularity(&graph, &partition).expect("valid") - expected).abs() < 1e-12);
}

#[rstest]
fn resolution_scales_the_null_model() {
    let graph = graph_from(&GraphFixture::barbell(), false);
    let partition = split(&graph, &[&[0, 1, 2], &[3, 4, 5]]);
    let coarse = modularity_with_resolution(&graph, &partition, 0.5).expect("valid");
    let fine = modularity_with_resolution(&graph, &partition, 2.0).expect("valid");
    assert!(coarse > fine);
}

#[rstest]
fn edgeless_graph_scores_zero() {
    let mut graph = crate::Graph::undirected("dots");
    for vertex in 0..3 {
        graph.add_vertex(vertex, crate::Attributes::new()).expect("new vertex");
    }
    let partition = split(&graph, &[&[0], &[1], &[2]]);
    assert_eq!(modularity(&graph, &partition).expect("valid"), 0.0);
}

#[rstest]
fn negative_weights_are_rejected() {
    let graph = weighted(&[("a", "b", -2.0)]);
    let partition = Partition::from_communities(&graph, &[vec![id("a"), id("b")]]).expect("valid");
    assert_eq!(
        modularity(&graph, &partition).expect_err("negative").code(),
        AlgorithmErrorCode::NegativeWeight
    );
}

#[rstest]
fn girvan_newman_cuts_the_bridge_first() {
    let graph = graph_from(&GraphFixture::barbell(), false);
    let detected = girvan_newman(&graph, None).expect("valid graph");
    assert_eq!(detected.partition.community_count(), 2);
    assert_eq!(detected.partition.communities()[0], vec![int(0), int(1), int(2)]);
    assert_eq!(detected.levels[0].community_count, 1);
    assert_eq!(detected.levels[1].community_count, 2);
}

#[rstest]
fn girvan_newman_honours_a_target_count() {
    let graph = graph_from(&GraphFixture::two_cliques(4), false);
    let detected = girvan_newman(&graph, Some(3)).expect("reachable target");
    assert_eq!(detected.partition.community_count(), 3);
    assert_eq!(detected.levels.last().map(|level| level.community_count), Some(3));
}

#[rstest]
#[case::zero(0)]
#[case::too_many(99)]
fn girvan_newman_rejects_impossible_targets(#[case] target: usize) {
    let graph = graph_from(&GraphFixture::barbell(), false);
    let err = girvan_newman(&graph, Some(target)).expect_err("impossible target");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidParameter);
}

#[rstest]
fn community_detection_rejects_empty_graphs() {
    let graph = crate::Graph::undirected("empty");
    assert_eq!(
        girvan_newman(&graph, None).expect_err("empty").code(),
        AlgorithmErrorCode::EmptyGraph
    );
    assert_eq!(
        louvain(&graph, LouvainConfig::default()).expect_err("empty").code(),
        AlgorithmErrorCode::EmptyGraph
    );
}

#[rstest]
fn louvain_separates_two_cliques() {
    let graph = graph_from(&GraphFixture::two_cliques(5), false);
    let detected = louvain(&graph, LouvainConfig::default()).expect("valid graph");
    assert_eq!(detected.partition.community_count(), 2);
    let communities = detected.partition.communities();
    assert_eq!(communities[0], (0..5).map(int).collect::<Vec<_>>());
    assert_eq!(communities[1], (5..10).map(int).collect::<Vec<_>>());
    let recomputed = modularity(&graph, &detected.partition).expect("valid");
    assert!((recomputed - detected.modularity).abs() < 1e-9);
}

#[rstest]
fn louvain_treats_directed_edges_as_undirected() {
    let graph = directed(&[("a", "b"), ("b", "c"), ("c", "a"), ("x", "y"), ("y", "z"), ("z", "x"), ("c", "x")]);
    let detected = louvain(&graph, LouvainConfig::default()).expect("valid graph");
    assert_eq!(detected.partition.community(&id("a")), detected.partition.community(&id("b")));
    assert_ne!(detected.partition.community(&id("a")), detected.partition.community(&id("x")));
}

#[rstest]
fn louvain_rejects_non_positive_resolution() {
    let graph = graph_from(&GraphFixture::barbell(), false);
    let err = louvain(&graph, LouvainConfig::default().with_resolution(0.0)).expect_err("bad resolution");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidParameter);
}

#[rstest]
fn louvain_single_sweep_cap_still_returns_a_partition() {
    let graph = graph_from(&GraphFixture::two_cliques(4), false);
    let config = LouvainConfig::default().with_control(IterationControl::new(1, 1e-7));
    let detected = louvain(&graph, config).expect("cap is not an error");
    assert_eq!(detected.partition.len(), 8);
}

#[rstest]
fn identical_partitions_agree_perfectly() {
    let graph = graph_from(&GraphFixture::two_cliques(3), false);
    let partition = split(&graph, &[&[0, 1, 2], &[3, 4, 5]]);
    let agreement = partition_agreement(&partition, &partition).expect("same vertices");
    assert!((agreement.ari - 1.0).abs() < 1e-12);
    assert!((agreement.nmi - 1.0).abs() < 1e-12);
}

#[rstest]
fn agreement_ignores_label_permutations() {
    let graph = graph_from(&GraphFixture::two_cliques(3), false);
    let left = split(&graph, &[&[0, 1, 2], &[3, 4, 5]]);
    let right = split(&graph, &[&[3, 4, 5], &[0, 1, 2]]);
    assert!((adjusted_rand_index(&left, &right).expect("same vertices") - 1.0).abs() < 1e-12);
}

#[rstest]
fn crossing_partitions_score_low() {
    let graph = graph_from(&GraphFixture::two_cliques(2), false);
    let left = split(&graph, &[&[0, 1], &[2, 3]]);
    let right = split(&graph, &[&[0, 2], &[1, 3]]);
    assert!(adjusted_rand_index(&left, &right).expect("same vertices") < 0.0);
    assert!(normalized_mutual_information(&left, &right).expect("same vertices").abs() < 1e-12);
}

#[rstest]
fn agreement_requires_the_same_vertices() {
    let small = undirected(&[("a", "b")]);
    let large = undirected(&[("a", "b"), ("b", "c")]);
    let left = Partition::from_communities(&small, &[vec![id("a"), id("b")]]).expect("valid");
    let right = Partition::from_communities(&large, &[vec![id("a"), id("b"), id("c")]]).expect("valid");
    let err = partition_agreement(&left, &right).expect_err("different vertex sets");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidSolution);
}

proptest! {
    #![proptest_config(suite_proptest_config(48))]

    #[test]
    fn louvain_never_loses_to_singletons(graph in arb_undirected(12)) {
        prop_assume!(!graph.is_empty());
        let detected = louvain(&graph, LouvainConfig::default()).expect("valid graph");
        let first = detected.levels.first().map(|level| level.modularity).unwrap_or_default();
        prop_assert!(detected.modularity + 1e-9 >= first);
        prop_assert_eq!(detected.partition.len(), graph.vertex_count());
    }

    #[test]
    fn community_ids_are_contiguous(graph in arb_undirected(12)) {
        prop_assume!(!graph.is_empty());
        let detected = girvan_newman(&graph, None).expect("valid graph");
        let mut seen = vec![false; detected.partition.community_count()];
        let mut next = 0;
        for (_, &community) in detected.partition.assignments() {
            prop_assert!(community <= next);
            if community == next {
                next += 1;
            }
            seen[community] = true;
        }
        prop_assert!(seen.into_iter().all(|used| used));
    }

    #[test]
    fn modularity_stays_within_bounds(graph in arb_undirected(12)) {
        prop_assume!(!graph.is_empty());
        let detected = louvain(&graph, LouvainConfig::default()).expect("valid graph");
        prop_assert!((-0.5 - 1e-9..=1.0).contains(&detected.modularity));
    }
}
