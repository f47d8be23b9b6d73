//! Unit tests for TSP tours.

use std::collections::BTreeSet;

use grafo_test_support::fixtures::GraphFixture;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use test_strategy::Arbitrary;

use super::*;
use crate::{
    error::AlgorithmErrorCode,
    test_utils::{graph_from, id, suite_proptest_config, weighted, weighted_directed},
};

fn euclidean(points: &[(f64, f64)]) -> Graph {
    graph_from(&GraphFixture::euclidean(points), false)
}

/// Shortest closed tour by trying every order with vertex 0 fixed first.
fn brute_force_optimum(graph: &Graph) -> f64 {
    fn extend(order: &mut Vec<usize>, remaining: &mut Vec<usize>, weights: &[Vec<f64>]) -> f64 {
        if remaining.is_empty() {
            return order
                .iter()
                .zip(order.iter().cycle().skip(1))
                .map(|(&a, &b)| weights[a][b])
                .sum();
        }
        let mut best = f64::INFINITY;
        for slot in 0..remaining.len() {
            let next = remaining.remove(slot);
            order.push(next);
            best = best.min(extend(order, remaining, weights));
            order.pop();
            remaining.insert(slot, next);
        }
        best
    }

    let instance = Instance::load(graph, "brute_force").expect("complete graph");
    let n = instance.weights.len();
    extend(&mut vec![0], &mut (1..n).collect(), &instance.weights)
}

fn assert_visits_every_vertex_once(graph: &Graph, tour: &Tour) {
    assert_eq!(tour.cycle.len(), graph.vertex_count() + 1);
    assert_eq!(tour.cycle.first(), tour.cycle.last());
    let distinct: BTreeSet<&VertexId> = tour.cycle[1..].iter().collect();
    assert_eq!(distinct.len(), graph.vertex_count());
    let measured = tour_length(graph, &tour.cycle).expect("tour edges exist");
    assert!((measured - tour.length).abs() < 1e-9);
}

#[fixture]
fn hexagon() -> Graph {
    let points: Vec<(f64, f64)> = (0..6)
        .map(|step| {
            let angle = f64::from(step) * std::f64::consts::PI / 3.0;
            (angle.cos(), angle.sin())
        })
        .collect();
    euclidean(&points)
}

#[rstest]
#[case::square(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])]
#[case::scattered(&[(0.0, 0.0), (4.0, 1.0), (1.0, 3.0), (5.0, 5.0), (2.0, 7.0), (6.0, 2.0)])]
#[case::clustered(&[(0.0, 0.0), (0.1, 0.0), (10.0, 0.0), (10.0, 0.1), (5.0, 8.0), (5.1, 8.0), (5.0, 8.1)])]
fn christofides_stays_within_its_ratio(#[case] points: &[(f64, f64)]) {
    let graph = euclidean(points);
    let tour = christofides(&graph).expect("metric instance");
    assert_visits_every_vertex_once(&graph, &tour);
    assert_eq!(tour.approximation_ratio, Some(CHRISTOFIDES_RATIO));
    let optimum = brute_force_optimum(&graph);
    assert!(tour.length <= CHRISTOFIDES_RATIO * optimum + 1e-9);
    assert!(tour.length >= optimum - 1e-9);
}

#[rstest]
fn christofides_keeps_its_guarantee_on_large_odd_sets() {
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    let mut rng = SmallRng::seed_from_u64(150);
    let points: Vec<(f64, f64)> = (0..150)
        .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();
    let graph = euclidean(&points);
    let tour = christofides(&graph).expect("metric instance");
    assert_visits_every_vertex_once(&graph, &tour);
    assert_eq!(tour.approximation_ratio, Some(CHRISTOFIDES_RATIO));
    let instance = Instance::load(&graph, "christofides").expect("complete graph");
    let tree: f64 = mst::spanning_tree(&instance.weights).iter().map(|e| e.weight).sum();
    assert!(tour.length >= tree);
}

#[rstest]
fn christofides_walks_the_convex_hull(hexagon: Graph) {
    let tour = christofides(&hexagon).expect("metric instance");
    assert!((tour.length - 6.0).abs() < 1e-9);
    assert_eq!(tour.cycle.first(), Some(&VertexId::Int(0)));
}

#[rstest]
#[case::single(1, 0.0)]
#[case::pair(2, 6.0)]
fn christofides_handles_tiny_graphs(#[case] n: usize, #[case] length: f64) {
    let graph = euclidean(&[(0.0, 0.0), (3.0, 0.0)][..n]);
    let tour = christofides(&graph).expect("trivially metric");
    assert_eq!(tour.cycle.len(), n + 1);
    assert!((tour.length - length).abs() < 1e-12);
}

#[rstest]
fn christofides_rejects_directed_graphs() {
    let graph = weighted_directed(&[("a", "b", 1.0), ("b", "a", 1.0)]);
    let err = christofides(&graph).expect_err("directed");
    assert_eq!(err.code(), AlgorithmErrorCode::DirectedUnsupported);
    assert_eq!(err.kind(), crate::ErrorKind::UnsupportedOperation);
}

#[rstest]
fn missing_pairs_are_named() {
    let graph = weighted(&[("a", "b", 1.0), ("b", "c", 1.0)]);
    let err = christofides(&graph).expect_err("a and c are not joined");
    assert_eq!(
        err,
        AlgorithmError::NotComplete {
            from: id("a"),
            to: id("c")
        }
    );
}

#[rstest]
fn negative_weights_are_rejected() {
    let graph = weighted(&[("a", "b", 1.0), ("b", "c", -1.0), ("a", "c", 1.0)]);
    let err = christofides(&graph).expect_err("negative weight");
    assert_eq!(err.code(), AlgorithmErrorCode::NegativeWeight);
}

#[rstest]
fn triangle_violations_name_the_triple() {
    let graph = weighted(&[("a", "b", 1.0), ("b", "c", 1.0), ("a", "c", 5.0)]);
    let err = christofides(&graph).expect_err("not metric");
    assert_eq!(
        err,
        AlgorithmError::NonMetric {
            a: id("a"),
            b: id("b"),
            c: id("c")
        }
    );
    // The heuristics do not need the triangle inequality.
    assert!(nearest_neighbor_tour(&graph, None).is_ok());
}

#[rstest]
fn empty_graph_is_an_error() {
    let err = christofides(&Graph::undirected("empty")).expect_err("no vertices");
    assert_eq!(err.code(), AlgorithmErrorCode::EmptyGraph);
}

#[rstest]
fn seeded_genetic_runs_repeat(hexagon: Graph) {
    let config = GeneticConfig::default()
        .with_population(30)
        .with_generations(40)
        .with_seed(0x5EED);
    let first = genetic_tour(&hexagon, config).expect("complete graph");
    let second = genetic_tour(&hexagon, config).expect("complete graph");
    assert_eq!(first, second);
    assert_visits_every_vertex_once(&hexagon, &first);
    assert_eq!(first.approximation_ratio, None);
    assert!(first.length >= 6.0 - 1e-9);
}

#[rstest]
fn genetic_finds_the_square_perimeter() {
    let graph = euclidean(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
    let config = GeneticConfig::default()
        .with_population(30)
        .with_generations(20)
        .with_seed(11);
    let tour = genetic_tour(&graph, config).expect("complete graph");
    assert!((tour.length - 4.0).abs() < 1e-9);
}

#[rstest]
fn genetic_follows_arc_directions() {
    let graph = weighted_directed(&[
        ("a", "b", 1.0),
        ("b", "c", 1.0),
        ("c", "a", 1.0),
        ("b", "a", 10.0),
        ("c", "b", 10.0),
        ("a", "c", 10.0),
    ]);
    let config = GeneticConfig::default()
        .with_population(20)
        .with_generations(10)
        .with_seed(3);
    let tour = genetic_tour(&graph, config).expect("complete digraph");
    assert_eq!(tour.cycle, vec![id("a"), id("b"), id("c"), id("a")]);
    assert!((tour.length - 3.0).abs() < 1e-12);
}

#[rstest]
fn genetic_validates_its_settings() {
    let graph = euclidean(&[(0.0, 0.0), (1.0, 0.0)]);
    let err = genetic_tour(&graph, GeneticConfig::default().with_mutation_rate(2.0))
        .expect_err("rate above one");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidParameter);
}

fn line() -> Graph {
    let position = [("a", 0.0), ("b", 1.0), ("c", 3.0), ("d", 7.0)];
    let mut edges = Vec::new();
    for (i, &(u, x)) in position.iter().enumerate() {
        for &(v, y) in &position[i + 1..] {
            edges.push((u, v, f64::abs(x - y)));
        }
    }
    weighted(&edges)
}

#[rstest]
#[case::first_vertex(None, &["a", "b", "c", "d", "a"])]
#[case::far_end(Some("d"), &["d", "c", "b", "a", "d"])]
fn nearest_neighbor_walks_to_the_closest_vertex(
    #[case] start: Option<&str>,
    #[case] expected: &[&str],
) {
    let start = start.map(id);
    let tour = nearest_neighbor_tour(&line(), start.as_ref()).expect("complete graph");
    let expected: Vec<VertexId> = expected.iter().map(|&name| id(name)).collect();
    assert_eq!(tour.cycle, expected);
    assert!((tour.length - 14.0).abs() < 1e-12);
}

#[rstest]
fn nearest_neighbor_rejects_unknown_start() {
    let err = nearest_neighbor_tour(&line(), Some(&id("z"))).expect_err("unknown vertex");
    assert_eq!(err.code(), AlgorithmErrorCode::VertexNotFound);
}

#[rstest]
fn tour_length_requires_consecutive_edges() {
    let graph = weighted(&[("a", "b", 2.0), ("b", "c", 3.0)]);
    let length = tour_length(&graph, &[id("a"), id("b"), id("c")]).expect("path exists");
    assert!((length - 5.0).abs() < 1e-12);
    let err = tour_length(&graph, &[id("a"), id("c")]).expect_err("no a-c edge");
    assert_eq!(err.code(), AlgorithmErrorCode::NotComplete);
    let err = tour_length(&graph, &[id("a"), id("q")]).expect_err("unknown vertex");
    assert_eq!(err.code(), AlgorithmErrorCode::VertexNotFound);
}

#[rstest]
fn comparison_reports_failures_without_aborting() {
    let graph = weighted(&[("a", "b", 1.0), ("b", "c", 1.0), ("a", "c", 5.0)]);
    let comparison = compare_tsp_methods(
        &graph,
        GeneticConfig::default().with_generations(5).with_seed(1),
    );
    let methods: Vec<&str> = comparison.reports.iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["christofides", "genetic", "nearest_neighbor"]);
    assert!(matches!(
        comparison.reports[0].outcome,
        MethodOutcome::Failed {
            code: "ALGORITHM_NON_METRIC",
            ..
        }
    ));
    assert!(comparison.reports[1..].iter().all(|r| r.length().is_some()));
    assert!(comparison.reports.iter().all(|r| r.elapsed_ms >= 0.0));
    let best = comparison.best().expect("a heuristic succeeded");
    assert!((best.length().expect("solved") - 7.0).abs() < 1e-12);

    let value = serde_json::to_value(&comparison).expect("serializable");
    assert_eq!(value["reports"][0]["status"], "failed");
    assert_eq!(value["reports"][2]["status"], "solved");
}

/// Shape of a generated point cloud.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
enum PointLayout {
    /// Points on a 20x20 integer grid.
    #[weight(3)]
    Grid,
    /// Two tight clusters far apart.
    #[weight(2)]
    Clustered,
    /// Every point on the x axis.
    #[weight(1)]
    Collinear,
}

impl PointLayout {
    fn place(self, x: u8, y: u8) -> (f64, f64) {
        let (x, y) = (f64::from(x), f64::from(y));
        match self {
            Self::Grid => (x, y),
            Self::Clustered => {
                let centre = if x < 10.0 { 0.0 } else { 50.0 };
                (centre + x * 0.1, centre + y * 0.1)
            }
            Self::Collinear => (x, 0.0),
        }
    }
}

fn arb_points() -> impl Strategy<Value = Vec<(f64, f64)>> {
    (
        any::<PointLayout>(),
        proptest::collection::vec((0_u8..20, 0_u8..20), 3..=7),
    )
        .prop_map(|(layout, raw)| raw.into_iter().map(|(x, y)| layout.place(x, y)).collect())
}

proptest! {
    #![proptest_config(suite_proptest_config(32))]

    #[test]
    fn christofides_is_within_half_again_of_optimal(points in arb_points()) {
        let graph = euclidean(&points);
        let tour = christofides(&graph).expect("euclidean distances are metric");
        let optimum = brute_force_optimum(&graph);
        prop_assert!(tour.length <= CHRISTOFIDES_RATIO * optimum + 1e-6);
        prop_assert_eq!(tour.cycle.len(), points.len() + 1);
    }
}
