//! Tests for the `Engine` front door.

mod common;

use grafo_core::{
    Attributes, EngineBuilder, Graph, SearchBudget,
    registry::{AlgorithmConfig, AlgorithmOutput},
};
use grafo_test_support::{fixtures::GraphFixture, tracing::RecordingLayer};
use rstest::{fixture, rstest};
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn petersen() -> Graph {
    common::build(&GraphFixture::petersen(), false)
}

#[rstest]
fn builder_defaults() {
    let builder = EngineBuilder::new();
    assert_eq!(builder.search_budget(), SearchBudget::default());
    assert_eq!(builder.max_iterations(), None);
    let engine = builder.build().expect("defaults valid");
    assert!(engine.algorithms().any(|spec| spec.name == "louvain"));
}

#[rstest]
#[case::eulerian_kind("eulerian_kind", "eulerian_kind")]
#[case::coloring("chromatic_number", "chromatic_estimate")]
#[case::cliques("clique_number", "count")]
#[case::planarity("planarity", "planarity")]
#[case::spectrum("laplacian_spectrum", "spectrum")]
#[case::hamiltonian("hamiltonian_cycle", "cycle")]
fn petersen_runs_through_every_family(petersen: Graph, #[case] algorithm: &str, #[case] kind: &str) {
    let engine = EngineBuilder::new().build().expect("defaults valid");
    let output = engine
        .run(algorithm, &petersen, AlgorithmConfig::new())
        .unwrap_or_else(|err| panic!("{algorithm} failed: {err}"));
    assert_eq!(output.kind(), kind);
}

#[rstest]
fn petersen_has_no_hamiltonian_cycle(petersen: Graph) {
    let engine = EngineBuilder::new().build().expect("defaults valid");
    let output = engine
        .run("hamiltonian_cycle", &petersen, AlgorithmConfig::new())
        .expect("default budget suffices");
    assert_eq!(output, AlgorithmOutput::Cycle(None));
}

#[rstest]
fn critical_path_reads_a_custom_attribute() {
    let mut graph = Graph::directed("plan");
    for (name, cost) in [("a", 2), ("b", 3), ("c", 1)] {
        let mut attributes = Attributes::new();
        attributes.insert("cost".to_owned(), cost.into());
        graph.add_vertex(name, attributes).expect("new vertex");
    }
    graph.add_edge("a", "b", 1.0, Attributes::new()).expect("known endpoints");
    graph.add_edge("a", "c", 1.0, Attributes::new()).expect("known endpoints");

    let engine = EngineBuilder::new().build().expect("defaults valid");
    let output = engine
        .run("critical_path", &graph, AlgorithmConfig::new().with("attribute", "cost"))
        .expect("acyclic");
    let AlgorithmOutput::CriticalPath(path) = output else {
        panic!("expected a critical path");
    };
    assert!((path.duration - 5.0).abs() < 1e-12);
    assert_eq!(path.path.len(), 2);
}

#[rstest]
fn runs_are_traced(petersen: Graph) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let engine = EngineBuilder::new().build().expect("defaults valid");
    tracing::subscriber::with_default(subscriber, || {
        engine
            .run("maximal_cliques", &petersen, AlgorithmConfig::new())
            .expect("within budget");
    });
    assert!(layer.has_span("engine.run"));
    assert!(layer.has_span("registry.run"));
    assert!(layer.has_span("cliques.maximal"));
}
