//! Command definitions and execution.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use grafo_core::{
    AlgorithmError, AttributeValue, Engine, EngineBuilder, Graph, SearchBudget,
    registry::{AlgorithmConfig, AlgorithmOutput},
};
use grafo_providers_json::{JsonFormat, JsonGraphError};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "grafo", about = "Run graph-theory algorithms over JSON graphs.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run one algorithm against a graph file.
    Run(RunCommand),
    /// List the registered algorithms.
    List,
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Registered algorithm name, as printed by `grafo list`.
    pub algorithm: String,

    /// Path to the JSON graph document.
    pub graph: PathBuf,

    /// Algorithm parameter as `key=value`; repeatable.
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<Parameter>,

    /// JSON graph used as the pattern of isomorphism searches.
    #[arg(long)]
    pub pattern: Option<PathBuf>,

    /// Default node cap for exponential searches.
    #[arg(long = "max-nodes")]
    pub max_nodes: Option<u64>,

    /// Default wall-clock limit for exponential searches, in milliseconds.
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Default iteration cap for iterative algorithms.
    #[arg(long = "max-iterations")]
    pub max_iterations: Option<usize>,

    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// One `key=value` algorithm parameter.
///
/// Values are typed like attribute literals: `true`/`false`, integers,
/// floats, anything else text.
///
/// # Examples
/// ```
/// use grafo_cli::cli::Parameter;
/// use grafo_core::AttributeValue;
///
/// let parameter: Parameter = "damping=0.9".parse()?;
/// assert_eq!(parameter.key, "damping");
/// assert_eq!(parameter.value, AttributeValue::Float(0.9));
/// # Ok::<(), String>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub key: String,
    /// Parsed value.
    pub value: AttributeValue,
}

impl FromStr for Parameter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("parameter name missing in `{raw}`"));
        }
        Ok(Self {
            key: key.to_owned(),
            value: AttributeValue::parse(value.trim()),
        })
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A graph document could not be loaded.
    #[error(transparent)]
    Input(#[from] JsonGraphError),
    /// Engine configuration or the algorithm itself failed.
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),
}

impl CliError {
    /// Stable machine-readable code of the underlying failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Input(err) => err.code(),
            Self::Algorithm(err) => err.code().as_str(),
        }
    }
}

/// A registered algorithm as printed by `grafo list`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmListing {
    /// Registry key.
    pub name: &'static str,
    /// Algorithm family.
    pub family: &'static str,
    /// One-line description.
    pub summary: &'static str,
}

/// Result of a `run` invocation as written to stdout.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    /// Algorithm that ran.
    pub algorithm: String,
    /// Name of the input graph.
    pub graph: String,
    /// Tagged algorithm output.
    pub output: AlgorithmOutput,
    /// Whether the JSON is indented.
    #[serde(skip)]
    pub pretty: bool,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionSummary {
    /// Output of `grafo list`.
    Algorithms(Vec<AlgorithmListing>),
    /// Output of `grafo run`.
    Run(RunReport),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the input, configuring the engine or
/// running the algorithm fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use grafo_cli::cli::{Cli, Command, ExecutionSummary, RunCommand, run_cli};
/// # use grafo_core::registry::AlgorithmOutput;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     r#"{"nome": "pair", "arestas": [{"origem": "a", "destino": "b"}]}"#,
/// )?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         algorithm: "clique_number".into(),
///         graph: file.path().to_path_buf(),
///         params: Vec::new(),
///         pattern: None,
///         max_nodes: None,
///         timeout_ms: None,
///         max_iterations: None,
///         pretty: false,
///     }),
/// };
/// let ExecutionSummary::Run(report) = run_cli(cli)? else {
///     panic!("expected a run report");
/// };
/// assert_eq!(report.output, AlgorithmOutput::Count(2));
/// # Ok(())
/// # }
/// ```
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => run_command(run).map(ExecutionSummary::Run),
        Command::List => Ok(ExecutionSummary::Algorithms(list_algorithms(
            &EngineBuilder::new().build()?,
        ))),
    }
}

pub(super) fn list_algorithms(engine: &Engine) -> Vec<AlgorithmListing> {
    engine
        .algorithms()
        .map(|spec| AlgorithmListing {
            name: spec.name,
            family: spec.family,
            summary: spec.summary,
        })
        .collect()
}

#[instrument(
    name = "cli.run",
    err,
    skip(command),
    fields(algorithm = %command.algorithm, path = field::Empty, parameters = command.params.len()),
)]
pub(super) fn run_command(command: RunCommand) -> Result<RunReport, CliError> {
    let RunCommand {
        algorithm,
        graph: path,
        params,
        pattern,
        max_nodes,
        timeout_ms,
        max_iterations,
        pretty,
    } = command;
    Span::current().record("path", field::display(path.display()));

    let engine = build_engine(max_nodes, timeout_ms, max_iterations)?;
    let format = JsonFormat::new();
    let graph = load_graph(&format, &path)?;
    let mut config = params
        .into_iter()
        .fold(AlgorithmConfig::new(), |config, Parameter { key, value }| {
            config.with(key, value)
        });
    if let Some(pattern) = pattern {
        config = config.with_pattern(load_graph(&format, &pattern)?);
    }

    let output = engine.run(&algorithm, &graph, config)?;
    info!(
        algorithm = %algorithm,
        graph = graph.name(),
        kind = output.kind(),
        "run completed"
    );
    Ok(RunReport {
        algorithm,
        graph: graph.name().to_owned(),
        output,
        pretty,
    })
}

pub(super) fn build_engine(
    max_nodes: Option<u64>,
    timeout_ms: Option<u64>,
    max_iterations: Option<usize>,
) -> Result<Engine, CliError> {
    let mut builder = EngineBuilder::new();
    if max_nodes.is_some() || timeout_ms.is_some() {
        let mut budget = SearchBudget::nodes(max_nodes.unwrap_or(SearchBudget::DEFAULT_MAX_NODES));
        if let Some(millis) = timeout_ms {
            budget = budget.with_deadline(Duration::from_millis(millis));
        }
        builder = builder.with_search_budget(budget);
    }
    if let Some(cap) = max_iterations {
        builder = builder.with_max_iterations(cap);
    }
    Ok(builder.build()?)
}

fn load_graph(format: &JsonFormat, path: &Path) -> Result<Graph, CliError> {
    let graph = format.load(path)?;
    info!(
        graph = graph.name(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        directed = graph.is_directed(),
        "graph loaded"
    );
    Ok(graph)
}

/// Renders `summary` to `writer`: a tab-separated table for listings, JSON
/// for run reports.
///
/// # Errors
/// Returns [`io::Error`] if writing or serializing fails.
///
/// # Examples
/// ```
/// # use grafo_cli::cli::{AlgorithmListing, ExecutionSummary, render_summary};
/// let summary = ExecutionSummary::Algorithms(vec![AlgorithmListing {
///     name: "pagerank",
///     family: "centrality",
///     summary: "PageRank scores",
/// }]);
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8_lossy(&buffer), "pagerank\tcentrality\tPageRank scores\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Algorithms(listings) => {
            for listing in listings {
                writeln!(
                    writer,
                    "{}\t{}\t{}",
                    listing.name, listing.family, listing.summary
                )?;
            }
        }
        ExecutionSummary::Run(report) => {
            if report.pretty {
                serde_json::to_writer_pretty(&mut writer, report)?;
            } else {
                serde_json::to_writer(&mut writer, report)?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}
