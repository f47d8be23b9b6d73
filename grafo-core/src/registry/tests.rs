//! Unit tests for name-keyed dispatch.

use grafo_test_support::{fixtures::GraphFixture, tracing::RecordingLayer};
use rstest::{fixture, rstest};
use tracing_subscriber::layer::SubscriberExt;

use super::*;
use crate::{
    AttributeValue, Attributes,
    error::AlgorithmErrorCode,
    test_utils::{directed, graph_from, id, undirected, weighted, weighted_directed},
};

#[fixture]
fn registry() -> AlgorithmRegistry {
    AlgorithmRegistry::new()
}

#[rstest]
fn builtin_names_are_unique_and_snake_case(registry: AlgorithmRegistry) {
    let specs: Vec<&AlgorithmSpec> = registry.iter().collect();
    assert_eq!(specs.len(), builtin::all().len());
    for spec in specs {
        assert!(
            spec.name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "{}",
            spec.name
        );
        assert!(!spec.summary.is_empty());
    }
}

#[rstest]
#[case::centrality("pagerank")]
#[case::coloring("k_colorable")]
#[case::community("louvain")]
#[case::spectral("algebraic_connectivity")]
#[case::flow("max_flow")]
#[case::matching("hopcroft_karp")]
#[case::isomorphism("subgraph_isomorphism")]
#[case::planarity("planarity")]
#[case::tsp("christofides")]
#[case::cycles("eulerian_circuit")]
#[case::cliques("maximal_cliques")]
#[case::topological("critical_path")]
#[case::paths("floyd_warshall")]
#[case::spanning_tree("minimum_spanning_tree")]
fn every_family_is_registered(registry: AlgorithmRegistry, #[case] name: &str) {
    assert!(registry.contains(name));
}

#[rstest]
fn unknown_names_are_configuration_errors(registry: AlgorithmRegistry) {
    let graph = undirected(&[("a", "b")]);
    let err = registry
        .run("dijkstra_but_faster", &graph, &AlgorithmConfig::new())
        .expect_err("not registered");
    assert_eq!(err.code(), AlgorithmErrorCode::UnknownAlgorithm);
    assert_eq!(err.kind(), crate::ErrorKind::Configuration);
}

#[rstest]
#[case::flow_without_sink("max_flow", AlgorithmConfig::new().with("source", "a"), "sink")]
#[case::colorable_without_k("k_colorable", AlgorithmConfig::new(), "k")]
#[case::clustering_without_k("spectral_clustering", AlgorithmConfig::new(), "k")]
#[case::isomorphism_without_pattern("isomorphism", AlgorithmConfig::new(), "pattern")]
#[case::dijkstra_without_source("dijkstra", AlgorithmConfig::new(), "source")]
#[case::path_without_target("shortest_path", AlgorithmConfig::new().with("source", "a"), "target")]
fn missing_parameters_are_named(
    registry: AlgorithmRegistry,
    #[case] algorithm: &str,
    #[case] config: AlgorithmConfig,
    #[case] parameter: &str,
) {
    let graph = directed(&[("a", "b")]);
    let err = registry.run(algorithm, &graph, &config).expect_err("parameter missing");
    assert!(
        matches!(err, AlgorithmError::MissingParameter { name, .. } if name == parameter),
        "{err}"
    );
}

#[rstest]
#[case::text_for_number("pagerank", AlgorithmConfig::new().with("damping", "high"))]
#[case::negative_count("k_colorable", AlgorithmConfig::new().with("k", -2))]
#[case::float_vertex("max_flow", AlgorithmConfig::new().with("source", 1.5).with("sink", "b"))]
#[case::unknown_strategy("coloring", AlgorithmConfig::new().with("strategy", "rainbow"))]
#[case::zero_tolerance("katz_centrality", AlgorithmConfig::new().with("tolerance", 0.0))]
#[case::unknown_tree_method("minimum_spanning_tree", AlgorithmConfig::new().with("method", "boruvka"))]
fn malformed_parameters_are_rejected(
    registry: AlgorithmRegistry,
    #[case] algorithm: &str,
    #[case] config: AlgorithmConfig,
) {
    let graph = directed(&[("a", "b")]);
    let err = registry.run(algorithm, &graph, &config).expect_err("malformed");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidParameter);
}

#[rstest]
fn square_results_match_the_direct_calls(registry: AlgorithmRegistry) {
    let graph = graph_from(&GraphFixture::cycle(4), false);
    let config = AlgorithmConfig::new();
    let AlgorithmOutput::Number(connectivity) = registry
        .run("algebraic_connectivity", &graph, &config)
        .expect("connected")
    else {
        panic!("expected a number");
    };
    assert!((connectivity - 2.0).abs() < 1e-9);
    assert_eq!(
        registry.run("clique_number", &graph, &config),
        Ok(AlgorithmOutput::Count(2))
    );
    let output = registry
        .run("coloring", &graph, &config.clone().with("strategy", "dsatur"))
        .expect("colourable");
    assert!(matches!(output, AlgorithmOutput::Coloring(ref coloring) if coloring.color_count() == 2));
}

#[rstest]
fn flow_terminals_accept_integer_ids(registry: AlgorithmRegistry) {
    let graph = graph_from(&GraphFixture::path(3), true);
    let config = AlgorithmConfig::new().with("source", 0).with("sink", 2);
    let output = registry.run("max_flow", &graph, &config).expect("path carries flow");
    assert!(matches!(output, AlgorithmOutput::MaxFlow(ref flow) if (flow.value - 1.0).abs() < 1e-12));
}

#[rstest]
fn pattern_graphs_feed_isomorphism(registry: AlgorithmRegistry) {
    let target = graph_from(&GraphFixture::complete(4), false);
    let triangle = graph_from(&GraphFixture::cycle(3), false);
    let config = AlgorithmConfig::new().with_pattern(triangle);
    let output = registry
        .run("enumerate_subgraph_isomorphisms", &target, &config.clone().with("limit", 5))
        .expect("within budget");
    assert!(matches!(output, AlgorithmOutput::Mappings(ref all) if all.len() == 5));
    let output = registry.run("isomorphism", &target, &config).expect("within budget");
    assert_eq!(output, AlgorithmOutput::Mapping(None));
}

#[rstest]
fn modularity_reads_the_partition_from_attributes(registry: AlgorithmRegistry) {
    let mut graph = Graph::undirected("halves");
    for (name, side) in [("a", 0), ("b", 0), ("c", 1), ("d", 1)] {
        let mut attributes = Attributes::new();
        attributes.insert("side".into(), AttributeValue::from(side));
        graph.add_vertex(name, attributes).expect("new vertex");
    }
    for (s, t) in [("a", "b"), ("c", "d")] {
        graph.add_edge(s, t, 1.0, Attributes::new()).expect("known endpoints");
    }
    let config = AlgorithmConfig::new().with("attribute", "side");
    let AlgorithmOutput::Number(score) = registry.run("modularity", &graph, &config).expect("partition")
    else {
        panic!("expected a number");
    };
    assert!((score - 0.5).abs() < 1e-12);

    let err = registry
        .run("modularity", &graph, &AlgorithmConfig::new())
        .expect_err("no community attribute");
    assert!(matches!(err, AlgorithmError::InvalidAttribute { ref vertex, .. } if *vertex == id("a")));
}

fn labelled(sides: &[(&str, i64)], edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::undirected("labelled");
    for &(name, side) in sides {
        let mut attributes = Attributes::new();
        attributes.insert("part".into(), AttributeValue::from(side));
        graph.add_vertex(name, attributes).expect("new vertex");
    }
    for &(s, t) in edges {
        graph.add_edge(s, t, 1.0, Attributes::new()).expect("known endpoints");
    }
    graph
}

#[rstest]
fn hopcroft_karp_reads_declared_sides(registry: AlgorithmRegistry) {
    let graph = labelled(
        &[("a", 0), ("b", 0), ("x", 1), ("y", 1)],
        &[("a", "x"), ("b", "x"), ("b", "y")],
    );
    let config = AlgorithmConfig::new().with("side", "part");
    let AlgorithmOutput::Matching(matching) =
        registry.run("hopcroft_karp", &graph, &config).expect("valid split")
    else {
        panic!("expected a matching");
    };
    assert_eq!(matching.size, 2);
    assert!(matching.pairs.iter().all(|pair| [id("a"), id("b")].contains(&pair.left)));
}

#[rstest]
fn hopcroft_karp_rejects_a_declared_split_with_an_inner_edge(registry: AlgorithmRegistry) {
    let graph = labelled(&[("a", 0), ("b", 0), ("x", 1)], &[("a", "x"), ("a", "b")]);
    let config = AlgorithmConfig::new().with("side", "part");
    let err = registry
        .run("hopcroft_karp", &graph, &config)
        .expect_err("a-b stays on one side");
    assert_eq!(err.code(), AlgorithmErrorCode::InvalidBipartition);
    // Without a declaration the path a-b, a-x is two-coloured automatically.
    assert!(registry.run("hopcroft_karp", &graph, &AlgorithmConfig::new()).is_ok());
}

#[rstest]
fn hopcroft_karp_needs_two_side_values(registry: AlgorithmRegistry) {
    let graph = labelled(&[("a", 0), ("x", 1), ("z", 2)], &[("a", "x")]);
    let config = AlgorithmConfig::new().with("side", "part");
    let err = registry.run("hopcroft_karp", &graph, &config).expect_err("three sides");
    assert!(matches!(err, AlgorithmError::InvalidAttribute { ref vertex, .. } if *vertex == id("z")));
    let err = registry
        .run("hopcroft_karp", &graph, &AlgorithmConfig::new().with("side", "missing"))
        .expect_err("attribute absent");
    assert!(matches!(err, AlgorithmError::InvalidAttribute { ref vertex, .. } if *vertex == id("a")));
}

#[rstest]
fn path_entries_match_the_direct_calls(registry: AlgorithmRegistry) {
    let graph = weighted_directed(&[("a", "b", 4.0), ("a", "c", 1.0), ("c", "b", 2.0)]);
    let config = AlgorithmConfig::new().with("source", "a").with("target", "b");
    let output = registry.run("shortest_path", &graph, &config).expect("reachable");
    let direct = crate::shortest_path::shortest_path(&graph, &id("a"), &id("b")).expect("reachable");
    assert_eq!(output, AlgorithmOutput::Path(direct));
    let output = registry.run("dijkstra", &graph, &config).expect("known source");
    assert!(matches!(
        output,
        AlgorithmOutput::ShortestPaths(ref tree) if tree.distance(&id("b")) == Some(3.0)
    ));
    let output = registry.run("floyd_warshall", &graph, &AlgorithmConfig::new()).expect("no cycle");
    assert_eq!(output.kind(), "distance_matrix");

    let err = registry
        .run("shortest_path", &graph, &config.with("source", "b"))
        .expect_err("b has no outgoing arcs");
    assert_eq!(err.code(), AlgorithmErrorCode::NoPath);
}

#[rstest]
#[case::kruskal(AlgorithmConfig::new(), "kruskal")]
#[case::prim(AlgorithmConfig::new().with("method", "prim"), "prim")]
#[case::prim_from_root(AlgorithmConfig::new().with("method", "prim").with("root", "d"), "prim")]
fn spanning_tree_entry_honours_the_method(
    registry: AlgorithmRegistry,
    #[case] config: AlgorithmConfig,
    #[case] method: &str,
) {
    let graph = weighted(&[("a", "b", 1.0), ("b", "c", 2.0), ("c", "d", 1.0), ("d", "a", 5.0)]);
    let output = registry
        .run("minimum_spanning_tree", &graph, &config)
        .expect("connected");
    let value = serde_json::to_value(&output).expect("serializable");
    assert_eq!(value["kind"], "spanning_tree");
    assert_eq!(value["result"]["method"], method);
    assert_eq!(value["result"]["total_weight"], 4.0);
}

#[rstest]
fn outputs_serialize_with_their_kind(registry: AlgorithmRegistry) {
    let graph = directed(&[("a", "b"), ("b", "c")]);
    let output = registry
        .run("topological_sort", &graph, &AlgorithmConfig::new())
        .expect("acyclic");
    let value = serde_json::to_value(&output).expect("serializable");
    assert_eq!(value, serde_json::json!({"kind": "vertices", "result": ["a", "b", "c"]}));
    assert_eq!(output.kind(), "vertices");

    let cycle = undirected(&[("a", "b")]);
    let output = registry
        .run("hamiltonian_cycle", &cycle, &AlgorithmConfig::new())
        .expect("within budget");
    let value = serde_json::to_value(&output).expect("serializable");
    assert_eq!(value, serde_json::json!({"kind": "cycle", "result": null}));
}

#[rstest]
fn dispatch_opens_an_info_span(registry: AlgorithmRegistry) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let graph = undirected(&[("a", "b"), ("b", "c")]);
    tracing::subscriber::with_default(subscriber, || {
        registry
            .run("degree_centrality", &graph, &AlgorithmConfig::new())
            .expect("infallible measure");
    });
    let span = layer
        .spans()
        .into_iter()
        .find(|span| span.name == "registry.run")
        .expect("dispatch span recorded");
    assert_eq!(span.fields["algorithm"], "degree_centrality");
    assert_eq!(span.fields["vertices"], "3");
    assert!(layer.events().iter().any(|event| {
        event.fields.get("kind").map(String::as_str) == Some("scores")
    }));
}

#[rstest]
fn replaced_entries_are_returned() {
    let mut registry = AlgorithmRegistry::empty();
    assert!(registry.is_empty());
    let spec = AlgorithmSpec {
        name: "count",
        family: "custom",
        summary: "vertex count",
        run: |graph, _| Ok(AlgorithmOutput::Count(graph.vertex_count())),
    };
    assert!(registry.register(spec).is_none());
    assert!(registry.register(spec).is_some());
    assert_eq!(registry.names().collect::<Vec<_>>(), ["count"]);
    let graph = undirected(&[("a", "b")]);
    assert_eq!(
        registry.run("count", &graph, &AlgorithmConfig::new()),
        Ok(AlgorithmOutput::Count(2))
    );
}

#[rstest]
fn budgets_combine_nodes_and_deadline() {
    let config = AlgorithmConfig::new().with("max_nodes", 10).with("timeout_ms", 250);
    let budget = config.search_budget().expect("well-formed");
    assert_eq!(budget.max_nodes(), Some(10));
    assert_eq!(budget.deadline(), Some(std::time::Duration::from_millis(250)));
    assert_eq!(
        AlgorithmConfig::new().search_budget(),
        Ok(crate::SearchBudget::default())
    );
}

#[rstest]
fn merging_keeps_request_values() {
    let defaults = AlgorithmConfig::new().with("max_nodes", 5).with("seed", 1);
    let merged = AlgorithmConfig::new().with("seed", 9).merged_over(&defaults);
    assert_eq!(merged.u64("seed"), Ok(Some(9)));
    assert_eq!(merged.u64("max_nodes"), Ok(Some(5)));
}
