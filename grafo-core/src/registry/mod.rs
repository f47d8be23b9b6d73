//! Name-keyed dispatch over every algorithm family.
//!
//! Each entry maps a stable snake-case name to a function
//! `fn(&Graph, &AlgorithmConfig) -> Result<AlgorithmOutput>`. Parameters
//! travel in an [`AlgorithmConfig`]; absent optional parameters fall back to
//! the family defaults, absent required ones fail with
//! [`AlgorithmError::MissingParameter`].

mod builtin;
mod config;
mod output;

use indexmap::IndexMap;
use tracing::{info, instrument};

pub use self::{config::AlgorithmConfig, output::AlgorithmOutput};
use crate::{
    error::{AlgorithmError, Result},
    graph::Graph,
};

/// Signature shared by every registry entry.
pub type AlgorithmFn = fn(&Graph, &AlgorithmConfig) -> Result<AlgorithmOutput>;

/// One registered algorithm.
#[derive(Clone, Copy, Debug)]
pub struct AlgorithmSpec {
    /// Stable name used for dispatch.
    pub name: &'static str,
    /// Family the algorithm belongs to, e.g. `centrality`.
    pub family: &'static str,
    /// One-line description; required parameters in parentheses, optional
    /// ones in brackets.
    pub summary: &'static str,
    /// Entry point.
    pub run: AlgorithmFn,
}

/// Table of algorithms keyed by name, in registration order.
///
/// # Examples
/// ```
/// use grafo_core::{
///     Attributes, Graph,
///     registry::{AlgorithmConfig, AlgorithmOutput, AlgorithmRegistry},
/// };
///
/// let mut graph = Graph::undirected("pair");
/// graph.add_vertex("a", Attributes::new())?;
/// graph.add_vertex("b", Attributes::new())?;
/// graph.add_edge("a", "b", 1.0, Attributes::new())?;
///
/// let registry = AlgorithmRegistry::new();
/// let output = registry.run("clique_number", &graph, &AlgorithmConfig::new())?;
/// assert_eq!(output, AlgorithmOutput::Count(2));
/// assert!(registry.run("nope", &graph, &AlgorithmConfig::new()).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct AlgorithmRegistry {
    entries: IndexMap<&'static str, AlgorithmSpec>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AlgorithmRegistry {
    /// Creates a registry holding every built-in algorithm.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for spec in builtin::all() {
            registry.register(spec);
        }
        registry
    }

    /// Creates a registry with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Adds an entry, returning the one it replaced.
    pub fn register(&mut self, spec: AlgorithmSpec) -> Option<AlgorithmSpec> {
        self.entries.insert(spec.name, spec)
    }

    /// Looks up an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AlgorithmSpec> {
        self.entries.get(name)
    }

    /// Returns `true` when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &AlgorithmSpec> + '_ {
        self.entries.values()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the algorithm registered as `name`.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::UnknownAlgorithm`] for an unregistered name
    /// and otherwise whatever the algorithm returns.
    #[instrument(
        name = "registry.run",
        level = "info",
        err,
        skip_all,
        fields(
            algorithm = name,
            graph = graph.name(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count()
        )
    )]
    pub fn run(&self, name: &str, graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
        let spec = self
            .get(name)
            .ok_or_else(|| AlgorithmError::UnknownAlgorithm { name: name.into() })?;
        let output = (spec.run)(graph, config)?;
        info!(family = spec.family, kind = output.kind(), "algorithm completed");
        Ok(output)
    }
}

#[cfg(test)]
mod tests;
