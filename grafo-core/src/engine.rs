//! Front door for running registered algorithms with workspace defaults.
//!
//! [`EngineBuilder`] collects the defaults applied when a request omits them
//! (search budget, iteration cap) and validates them once; [`Engine::run`]
//! merges them under the request's own parameters before dispatching through
//! the [`AlgorithmRegistry`].

use std::time::Duration;

use tracing::instrument;

use crate::{
    budget::SearchBudget,
    error::{AlgorithmError, Result},
    graph::Graph,
    registry::{AlgorithmConfig, AlgorithmOutput, AlgorithmRegistry, AlgorithmSpec},
};

/// Configures and constructs [`Engine`] instances.
///
/// # Examples
/// ```
/// use grafo_core::{EngineBuilder, SearchBudget};
///
/// let engine = EngineBuilder::new()
///     .with_search_budget(SearchBudget::nodes(5_000))
///     .with_max_iterations(250)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(engine.search_budget().max_nodes(), Some(5_000));
/// assert_eq!(engine.max_iterations(), Some(250));
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    search_budget: SearchBudget,
    max_iterations: Option<usize>,
    registry: Option<AlgorithmRegistry>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            search_budget: SearchBudget::default(),
            max_iterations: None,
            registry: None,
        }
    }
}

impl EngineBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use grafo_core::{EngineBuilder, SearchBudget};
    ///
    /// let builder = EngineBuilder::new();
    /// assert_eq!(builder.search_budget(), SearchBudget::default());
    /// assert_eq!(builder.max_iterations(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the budget applied to exponential searches whose request
    /// names neither `max_nodes` nor `timeout_ms`.
    #[must_use]
    pub const fn with_search_budget(mut self, budget: SearchBudget) -> Self {
        self.search_budget = budget;
        self
    }

    /// Returns the configured default search budget.
    #[must_use]
    #[rustfmt::skip]
    pub const fn search_budget(&self) -> SearchBudget { self.search_budget }

    /// Sets the iteration cap applied to iterative methods whose request
    /// omits `max_iterations`. Without it each family keeps its own default.
    #[must_use]
    pub const fn with_max_iterations(mut self, cap: usize) -> Self {
        self.max_iterations = Some(cap);
        self
    }

    /// Returns the configured default iteration cap.
    #[must_use]
    #[rustfmt::skip]
    pub const fn max_iterations(&self) -> Option<usize> { self.max_iterations }

    /// Replaces the built-in registry.
    #[must_use]
    pub fn with_registry(mut self, registry: AlgorithmRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validates the configuration and constructs an [`Engine`].
    ///
    /// # Errors
    /// Returns [`AlgorithmError::InvalidParameter`] when the node cap or the
    /// iteration cap is zero, or when a cap does not fit a parameter value.
    ///
    /// # Examples
    /// ```
    /// use grafo_core::{EngineBuilder, SearchBudget};
    ///
    /// assert!(EngineBuilder::new().with_max_iterations(0).build().is_err());
    /// assert!(EngineBuilder::new().with_search_budget(SearchBudget::nodes(0)).build().is_err());
    /// ```
    pub fn build(self) -> Result<Engine> {
        let mut defaults = AlgorithmConfig::new();
        if let Some(nodes) = self.search_budget.max_nodes() {
            if nodes == 0 {
                return Err(AlgorithmError::invalid_parameter("max_nodes", "must be positive"));
            }
            defaults.insert("max_nodes", parameter_int("max_nodes", u128::from(nodes))?);
        }
        if let Some(deadline) = self.search_budget.deadline() {
            defaults.insert("timeout_ms", parameter_int("timeout_ms", deadline.as_millis())?);
        }
        if let Some(cap) = self.max_iterations {
            if cap == 0 {
                return Err(AlgorithmError::invalid_parameter(
                    "max_iterations",
                    "must be positive",
                ));
            }
            let cap = u128::try_from(cap).unwrap_or(u128::MAX);
            defaults.insert("max_iterations", parameter_int("max_iterations", cap)?);
        }
        Ok(Engine {
            registry: self.registry.unwrap_or_default(),
            search_budget: self.search_budget,
            max_iterations: self.max_iterations,
            defaults,
        })
    }
}

fn parameter_int(name: &str, value: u128) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| AlgorithmError::invalid_parameter(name, format!("{value} is too large")))
}

/// Runs registered algorithms with workspace defaults applied.
///
/// # Examples
/// ```
/// use grafo_core::{
///     Attributes, EngineBuilder, Graph,
///     registry::{AlgorithmConfig, AlgorithmOutput},
/// };
///
/// let mut graph = Graph::directed("chain");
/// for id in ["a", "b"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge("a", "b", 1.0, Attributes::new())?;
///
/// let engine = EngineBuilder::new().build()?;
/// let output = engine.run("is_dag", &graph, AlgorithmConfig::new())?;
/// assert_eq!(output, AlgorithmOutput::Flag(true));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    registry: AlgorithmRegistry,
    search_budget: SearchBudget,
    max_iterations: Option<usize>,
    defaults: AlgorithmConfig,
}

impl Engine {
    /// Returns the default search budget.
    #[must_use]
    #[rustfmt::skip]
    pub const fn search_budget(&self) -> SearchBudget { self.search_budget }

    /// Returns the default iteration cap, if one was set.
    #[must_use]
    #[rustfmt::skip]
    pub const fn max_iterations(&self) -> Option<usize> { self.max_iterations }

    /// Returns the registry requests are dispatched through.
    #[must_use]
    #[rustfmt::skip]
    pub const fn registry(&self) -> &AlgorithmRegistry { &self.registry }

    /// Registered algorithms in registration order.
    pub fn algorithms(&self) -> impl ExactSizeIterator<Item = &AlgorithmSpec> + '_ {
        self.registry.iter()
    }

    /// Runs `algorithm` on `graph`.
    ///
    /// Defaults fill only parameters the request leaves out. A request that
    /// sets `timeout_ms` without `max_nodes` still inherits the default node
    /// cap.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::UnknownAlgorithm`] for an unregistered name
    /// and otherwise whatever the algorithm returns.
    #[instrument(
        name = "engine.run",
        level = "debug",
        err,
        skip(self, graph, config),
        fields(max_nodes = ?self.search_budget.max_nodes(), max_iterations = ?self.max_iterations)
    )]
    pub fn run(&self, algorithm: &str, graph: &Graph, config: AlgorithmConfig) -> Result<AlgorithmOutput> {
        let config = config.merged_over(&self.defaults);
        self.registry.run(algorithm, graph, &config)
    }

    /// Returns the deadline applied to searches that name none.
    #[must_use]
    pub fn default_deadline(&self) -> Option<Duration> {
        self.search_budget.deadline()
    }
}
