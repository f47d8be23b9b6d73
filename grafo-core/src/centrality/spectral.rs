//! Power-iteration measures: eigenvector centrality, PageRank and Katz.
//!
//! Directed graphs propagate score along edge direction, so a vertex is
//! central when central vertices point at it.

use tracing::{debug, instrument};

use super::{CentralityScores, l2_normalize, require_vertices};
use crate::{
    convergence::{IterationControl, iterate_to_fixed_point},
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph},
};

/// Eigenvector centrality via power iteration on `A + I`.
///
/// The shift by the identity keeps bipartite graphs from oscillating without
/// changing the dominant eigenvector. The result has unit Euclidean norm.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph and
/// [`AlgorithmError::ConvergenceFailure`] when `control` is exhausted.
#[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
#[instrument(name = "centrality.eigenvector", level = "debug", err, skip(graph, control))]
pub fn eigenvector_centrality(graph: &Graph, control: IterationControl) -> Result<CentralityScores> {
    require_vertices(graph, "eigenvector")?;
    let indexed = graph.indexed();
    let n = indexed.len();
    let fixed = iterate_to_fixed_point(
        "eigenvector",
        vec![1.0 / n as f64; n],
        control,
        |previous, next| {
            next.copy_from_slice(previous);
            propagate(&indexed, previous, next, 1.0);
            l2_normalize(next);
        },
    )?;
    debug!(iterations = fixed.iterations, "eigenvector centrality converged");
    Ok(CentralityScores::from_indexed(&indexed, fixed.values))
}

/// Adds `factor * w(u, v) * previous[u]` to `next[v]` for every edge, in both
/// directions for undirected graphs.
fn propagate(graph: &IndexedGraph, previous: &[f64], next: &mut [f64], factor: f64) {
    for (u, score) in previous.iter().enumerate() {
        for neighbour in graph.outgoing(u) {
            next[neighbour.index] += factor * neighbour.weight * score;
        }
    }
}

/// PageRank parameters.
///
/// # Examples
/// ```
/// use grafo_core::centrality::PageRankConfig;
///
/// let config = PageRankConfig::default().with_damping(0.9);
/// assert_eq!(config.damping(), 0.9);
/// assert_eq!(config.control().max_iterations(), 100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageRankConfig {
    damping: f64,
    control: IterationControl,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            control: IterationControl::default(),
        }
    }
}

impl PageRankConfig {
    /// Overrides the damping factor.
    #[must_use]
    pub const fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Overrides the iteration control.
    #[must_use]
    pub const fn with_control(mut self, control: IterationControl) -> Self {
        self.control = control;
        self
    }

    /// Damping factor (probability of following an edge).
    #[must_use]
    #[rustfmt::skip]
    pub const fn damping(&self) -> f64 { self.damping }

    /// Iteration cap and tolerance.
    #[must_use]
    #[rustfmt::skip]
    pub const fn control(&self) -> IterationControl { self.control }
}

/// PageRank with uniform teleportation.
///
/// Transition probabilities are proportional to edge weight. Mass sitting on
/// vertices without outgoing weight is redistributed uniformly. Scores sum to
/// one.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph,
/// [`AlgorithmError::InvalidParameter`] for a damping factor outside `[0, 1]`,
/// and [`AlgorithmError::ConvergenceFailure`] when the cap is exhausted.
#[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
#[instrument(name = "centrality.pagerank", level = "debug", err, skip(graph, config))]
pub fn pagerank(graph: &Graph, config: PageRankConfig) -> Result<CentralityScores> {
    require_vertices(graph, "pagerank")?;
    if !(0.0..=1.0).contains(&config.damping) {
        return Err(AlgorithmError::invalid_parameter(
            "damping",
            "must lie within [0, 1]",
        ));
    }
    let indexed = graph.indexed();
    let n = indexed.len();
    let uniform = 1.0 / n as f64;
    let out_weight: Vec<f64> = (0..n)
        .map(|u| indexed.outgoing(u).iter().map(|nb| nb.weight).sum())
        .collect();
    let alpha = config.damping;
    let fixed = iterate_to_fixed_point("pagerank", vec![uniform; n], config.control, |previous, next| {
        let dangling: f64 = previous
            .iter()
            .zip(&out_weight)
            .filter(|(_, weight)| **weight <= 0.0)
            .map(|(score, _)| score)
            .sum();
        next.fill((1.0 - alpha) * uniform + alpha * dangling * uniform);
        for (u, score) in previous.iter().enumerate() {
            if out_weight[u] <= 0.0 {
                continue;
            }
            for neighbour in indexed.outgoing(u) {
                next[neighbour.index] += alpha * score * neighbour.weight / out_weight[u];
            }
        }
    })?;
    debug!(iterations = fixed.iterations, "pagerank converged");
    Ok(CentralityScores::from_indexed(&indexed, fixed.values))
}

/// Katz centrality parameters.
///
/// # Examples
/// ```
/// use grafo_core::centrality::KatzConfig;
///
/// let config = KatzConfig::default();
/// assert_eq!(config.alpha(), 0.1);
/// assert_eq!(config.beta(), 1.0);
/// assert_eq!(config.control().max_iterations(), 1000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KatzConfig {
    alpha: f64,
    beta: f64,
    control: IterationControl,
}

impl Default for KatzConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 1.0,
            control: IterationControl::new(1000, 1e-6),
        }
    }
}

impl KatzConfig {
    /// Overrides the attenuation factor.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Overrides the constant bias.
    #[must_use]
    pub const fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Overrides the iteration control.
    #[must_use]
    pub const fn with_control(mut self, control: IterationControl) -> Self {
        self.control = control;
        self
    }

    /// Attenuation factor.
    #[must_use]
    #[rustfmt::skip]
    pub const fn alpha(&self) -> f64 { self.alpha }

    /// Constant bias added to every vertex.
    #[must_use]
    #[rustfmt::skip]
    pub const fn beta(&self) -> f64 { self.beta }

    /// Iteration cap and tolerance.
    #[must_use]
    #[rustfmt::skip]
    pub const fn control(&self) -> IterationControl { self.control }
}

/// Katz centrality `x = alpha * A^T x + beta`, normalized to unit length.
///
/// Converges only when `alpha` is below the reciprocal of the spectral radius;
/// otherwise the cap is exhausted.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph and
/// [`AlgorithmError::ConvergenceFailure`] when the cap is exhausted.
#[instrument(name = "centrality.katz", level = "debug", err, skip(graph, config))]
pub fn katz_centrality(graph: &Graph, config: KatzConfig) -> Result<CentralityScores> {
    require_vertices(graph, "katz")?;
    let indexed = graph.indexed();
    let n = indexed.len();
    let fixed = iterate_to_fixed_point("katz", vec![0.0; n], config.control, |previous, next| {
        next.fill(config.beta);
        propagate(&indexed, previous, next, config.alpha);
    })?;
    debug!(iterations = fixed.iterations, "katz centrality converged");
    let mut values = fixed.values;
    l2_normalize(&mut values);
    Ok(CentralityScores::from_indexed(&indexed, values))
}
