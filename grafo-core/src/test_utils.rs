//! Shared test utilities for `grafo-core`.

use grafo_test_support::{fixtures::GraphFixture, proptest_profile::ProptestRunProfile};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};

use crate::graph::{Attributes, Graph, VertexId};

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

fn vertex(index: usize) -> VertexId {
    VertexId::Int(i64::try_from(index).expect("fixture index fits in i64"))
}

/// Materialises a fixture with integer ids `0..n`.
#[must_use]
pub(crate) fn graph_from(fixture: &GraphFixture, directed: bool) -> Graph {
    let mut graph = if directed {
        Graph::directed(fixture.name.clone())
    } else {
        Graph::undirected(fixture.name.clone())
    };
    for index in 0..fixture.vertex_count {
        graph
            .add_vertex(vertex(index), Attributes::new())
            .expect("fixture ids are unique");
    }
    for &(s, t, weight) in &fixture.edges {
        graph
            .add_edge(vertex(s), vertex(t), weight, Attributes::new())
            .expect("fixture edges are valid");
    }
    graph
}

/// Undirected unit-weight graph whose vertices appear in first-mention order.
#[must_use]
pub(crate) fn undirected(edges: &[(&str, &str)]) -> Graph {
    from_named_edges(Graph::undirected("test"), edges.iter().map(|&(s, t)| (s, t, 1.0)))
}

/// Directed unit-weight graph whose vertices appear in first-mention order.
#[must_use]
pub(crate) fn directed(edges: &[(&str, &str)]) -> Graph {
    from_named_edges(Graph::directed("test"), edges.iter().map(|&(s, t)| (s, t, 1.0)))
}

/// Undirected weighted graph whose vertices appear in first-mention order.
#[must_use]
pub(crate) fn weighted(edges: &[(&str, &str, f64)]) -> Graph {
    from_named_edges(Graph::undirected("test"), edges.iter().copied())
}

/// Directed weighted graph whose vertices appear in first-mention order.
#[must_use]
pub(crate) fn weighted_directed(edges: &[(&str, &str, f64)]) -> Graph {
    from_named_edges(Graph::directed("test"), edges.iter().copied())
}

fn from_named_edges<'a>(
    mut graph: Graph,
    edges: impl Iterator<Item = (&'a str, &'a str, f64)>,
) -> Graph {
    for (s, t, weight) in edges {
        for id in [s, t] {
            let id = VertexId::from(id);
            if !graph.contains_vertex(&id) {
                graph
                    .add_vertex(id, Attributes::new())
                    .expect("vertex is new");
            }
        }
        graph
            .add_edge(s, t, weight, Attributes::new())
            .expect("test edges are valid");
    }
    graph
}

/// Shorthand for a string vertex id.
#[must_use]
pub(crate) fn id(name: &str) -> VertexId {
    VertexId::from(name)
}

/// Shorthand for an integer vertex id.
#[must_use]
pub(crate) fn int(value: i64) -> VertexId {
    VertexId::Int(value)
}

/// Simple undirected graphs on up to `max_vertices` vertices.
pub(crate) fn arb_undirected(max_vertices: usize) -> impl Strategy<Value = Graph> {
    (1..=max_vertices).prop_flat_map(|n| {
        let pairs = n * (n - 1) / 2;
        proptest::collection::vec(any::<bool>(), pairs).prop_map(move |mask| {
            let edges = (0..n)
                .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
                .zip(mask)
                .filter_map(|(pair, keep)| keep.then_some((pair.0, pair.1, 1.0)))
                .collect();
            graph_from(
                &GraphFixture {
                    name: format!("arb-{n}"),
                    vertex_count: n,
                    edges,
                },
                false,
            )
        })
    })
}

/// Bipartite graphs with sides `0..left` and `left..left+right`.
pub(crate) fn arb_bipartite(max_side: usize) -> impl Strategy<Value = (Graph, usize, usize)> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(left, right)| {
        proptest::collection::vec(any::<bool>(), left * right).prop_map(move |mask| {
            let edges = (0..left)
                .flat_map(|a| (left..left + right).map(move |b| (a, b)))
                .zip(mask)
                .filter_map(|(pair, keep)| keep.then_some((pair.0, pair.1, 1.0)))
                .collect();
            let fixture = GraphFixture {
                name: format!("arb-bip-{left}-{right}"),
                vertex_count: left + right,
                edges,
            };
            (graph_from(&fixture, false), left, right)
        })
    })
}

/// Directed flow networks on up to `max_vertices` vertices with integer
/// capacities in `1..=max_capacity`.
pub(crate) fn arb_network(
    max_vertices: usize,
    max_capacity: u32,
) -> impl Strategy<Value = Graph> {
    (2..=max_vertices).prop_flat_map(move |n| {
        proptest::collection::vec(proptest::option::of(1..=max_capacity), n * (n - 1)).prop_map(
            move |capacities| {
                let edges = (0..n)
                    .flat_map(|a| (0..n).filter(move |&b| b != a).map(move |b| (a, b)))
                    .zip(capacities)
                    .filter_map(|(pair, capacity)| {
                        capacity.map(|c| (pair.0, pair.1, f64::from(c)))
                    })
                    .collect();
                graph_from(
                    &GraphFixture {
                        name: format!("net-{n}"),
                        vertex_count: n,
                        edges,
                    },
                    true,
                )
            },
        )
    })
}
