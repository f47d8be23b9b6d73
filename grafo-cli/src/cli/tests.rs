//! Unit tests for the CLI commands.

use std::{fs, path::PathBuf};

use clap::Parser;
use grafo_core::{AlgorithmError, AttributeValue, registry::AlgorithmOutput};
use grafo_providers_json::JsonGraphError;
use grafo_test_support::tracing::RecordingLayer;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing_subscriber::layer::SubscriberExt;

use super::commands::{build_engine, list_algorithms, run_command};
use super::{
    Cli, CliError, Command, ExecutionSummary, Parameter, RunCommand, RunReport, render_summary,
    run_cli,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const SQUARE: &str = r#"{
    "nome": "square",
    "vertices": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}],
    "arestas": [
        {"origem": "a", "destino": "b", "peso": 1.0},
        {"origem": "b", "destino": "c", "peso": 2.0},
        {"origem": "c", "destino": "d", "peso": 1.0},
        {"origem": "d", "destino": "a", "peso": 2.0}
    ]
}"#;

#[fixture]
fn workspace() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("temporary file writable");
    path
}

fn run(algorithm: &str, graph: PathBuf) -> RunCommand {
    RunCommand {
        algorithm: algorithm.to_owned(),
        graph,
        params: Vec::new(),
        pattern: None,
        max_nodes: None,
        timeout_ms: None,
        max_iterations: None,
        pretty: false,
    }
}

#[rstest]
#[case::float("damping=0.85", "damping", AttributeValue::Float(0.85))]
#[case::integer("k = 3", "k", AttributeValue::Int(3))]
#[case::flag("normalized=false", "normalized", AttributeValue::Bool(false))]
#[case::text("strategy=dsatur", "strategy", AttributeValue::from("dsatur"))]
#[case::value_with_equals("label=a=b", "label", AttributeValue::from("a=b"))]
fn parameters_parse(#[case] raw: &str, #[case] key: &str, #[case] value: AttributeValue) {
    let parameter: Parameter = raw.parse().expect("well-formed parameter");
    assert_eq!(parameter, Parameter { key: key.to_owned(), value });
}

#[rstest]
#[case::no_separator("damping")]
#[case::no_name("=3")]
fn malformed_parameters_are_rejected(#[case] raw: &str) {
    assert!(raw.parse::<Parameter>().is_err());
}

#[rstest]
fn arguments_map_onto_the_run_command() {
    let cli = Cli::try_parse_from([
        "grafo",
        "run",
        "pagerank",
        "graph.json",
        "--param",
        "damping=0.9",
        "--param",
        "tolerance=1e-9",
        "--max-iterations",
        "50",
        "--pretty",
    ])
    .expect("valid arguments");
    let Command::Run(command) = cli.command else {
        panic!("expected the run command");
    };
    assert_eq!(command.algorithm, "pagerank");
    assert_eq!(command.graph, PathBuf::from("graph.json"));
    assert_eq!(command.params.len(), 2);
    assert_eq!(command.max_iterations, Some(50));
    assert!(command.pretty);
    assert!(Cli::try_parse_from(["grafo", "run", "pagerank", "g.json", "--param", "oops"]).is_err());
}

#[rstest]
fn list_reports_every_registered_algorithm() -> TestResult {
    let cli = Cli::try_parse_from(["grafo", "list"])?;
    let ExecutionSummary::Algorithms(listings) = run_cli(cli)? else {
        panic!("expected a listing");
    };
    let engine = build_engine(None, None, None)?;
    assert_eq!(listings, list_algorithms(&engine));
    assert!(listings.iter().any(|listing| listing.name == "christofides"));

    let mut buffer = Vec::new();
    render_summary(&ExecutionSummary::Algorithms(listings.clone()), &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?.lines().count(), listings.len());
    Ok(())
}

#[rstest]
fn run_prints_a_tagged_json_report(workspace: TempDir) -> TestResult {
    let graph = write_file(&workspace, "square.json", SQUARE);
    let mut command = run("max_flow", graph);
    command.params = vec!["source=a".parse()?, "sink=c".parse()?];
    let report = run_command(command)?;
    assert_eq!(report.graph, "square");

    let mut buffer = Vec::new();
    render_summary(&ExecutionSummary::Run(report), &mut buffer)?;
    let value: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(value["algorithm"], "max_flow");
    assert_eq!(value["output"]["kind"], "max_flow");
    assert_eq!(value["output"]["result"]["value"], 2.0);
    Ok(())
}

#[rstest]
fn patterns_are_loaded_from_their_own_file(workspace: TempDir) -> TestResult {
    let graph = write_file(&workspace, "square.json", SQUARE);
    let pattern = write_file(
        &workspace,
        "edge.json",
        r#"{"arestas": [{"origem": 0, "destino": 1}]}"#,
    );
    let mut command = run("enumerate_subgraph_isomorphisms", graph);
    command.pattern = Some(pattern);
    let report = run_command(command)?;
    assert!(matches!(report.output, AlgorithmOutput::Mappings(ref all) if all.len() == 8));
    Ok(())
}

#[rstest]
fn budgets_from_flags_reach_the_searches(workspace: TempDir) {
    let graph = write_file(&workspace, "square.json", SQUARE);
    let mut command = run("hamiltonian_cycle", graph);
    command.max_nodes = Some(1);
    let err = run_command(command).expect_err("one node is not enough");
    assert!(matches!(
        err,
        CliError::Algorithm(AlgorithmError::SearchBudgetExceeded { .. })
    ));
    assert_eq!(err.code(), "ALGORITHM_SEARCH_BUDGET_EXCEEDED");
}

#[rstest]
#[case::unknown_algorithm("shortest_dream", SQUARE, "ALGORITHM_UNKNOWN")]
#[case::malformed_graph("topological_sort", "[1, 2", "JSON_MALFORMED_DOCUMENT")]
#[case::undirected_input("topological_sort", SQUARE, "ALGORITHM_UNDIRECTED_UNSUPPORTED")]
fn failures_carry_stable_codes(
    workspace: TempDir,
    #[case] algorithm: &str,
    #[case] document: &str,
    #[case] code: &str,
) {
    let graph = write_file(&workspace, "graph.json", document);
    let err = run_command(run(algorithm, graph)).expect_err("command must fail");
    assert_eq!(err.code(), code, "{err}");
}

#[rstest]
fn missing_graph_files_are_input_errors(workspace: TempDir) {
    let err = run_command(run("pagerank", workspace.path().join("absent.json")))
        .expect_err("file does not exist");
    assert!(matches!(err, CliError::Input(JsonGraphError::Io { .. })));
}

#[rstest]
fn zero_iteration_caps_are_rejected() {
    let err = build_engine(None, None, Some(0)).expect_err("zero iterations");
    assert_eq!(err.code(), "ALGORITHM_INVALID_PARAMETER");
}

#[rstest]
fn pretty_reports_are_indented(workspace: TempDir) -> TestResult {
    let graph = write_file(&workspace, "square.json", SQUARE);
    let mut command = run("clique_number", graph);
    command.pretty = true;
    let report = run_command(command)?;
    assert_eq!(
        report,
        RunReport {
            algorithm: "clique_number".into(),
            graph: "square".into(),
            output: AlgorithmOutput::Count(2),
            pretty: true,
        }
    );
    let mut buffer = Vec::new();
    render_summary(&ExecutionSummary::Run(report), &mut buffer)?;
    assert!(String::from_utf8(buffer)?.contains("\n  \"algorithm\": \"clique_number\""));
    Ok(())
}

#[rstest]
fn runs_are_traced(workspace: TempDir) {
    let graph = write_file(&workspace, "square.json", SQUARE);
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        run_command(run("degree_centrality", graph)).expect("infallible measure");
    });
    let span = layer
        .spans()
        .into_iter()
        .find(|span| span.name == "cli.run")
        .expect("command span recorded");
    assert_eq!(span.fields["algorithm"], "degree_centrality");
    assert!(layer.has_span("json.load"));
    assert!(layer.has_span("engine.run"));
}
