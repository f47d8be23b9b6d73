//! Command-line interface orchestration.
//!
//! `grafo run` loads a JSON graph, dispatches one registered algorithm
//! through the [`grafo_core::Engine`] and prints the result as JSON;
//! `grafo list` prints the registered algorithm names.

mod commands;

pub use commands::{
    AlgorithmListing, Cli, CliError, Command, ExecutionSummary, Parameter, RunCommand, RunReport,
    render_summary, run_cli,
};

#[cfg(test)]
mod tests;
