//! Travelling-salesman tours on complete weighted graphs.
//!
//! Three constructions are available: Christofides' 3/2-approximation for
//! metric instances, a seeded genetic heuristic and the nearest-neighbour
//! baseline. [`compare_tsp_methods`] runs all three side by side.
//!
//! Tours are closed: the first vertex is repeated at the end. Self-loops are
//! ignored when reading the weights.

mod blossom;
mod christofides;
mod genetic;
mod mst;

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, instrument};

pub use self::genetic::GeneticConfig;
use self::christofides::christofides_order;
use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

/// Absolute slack allowed when checking the triangle inequality.
pub const TRIANGLE_TOLERANCE: f64 = 1e-9;

/// Approximation ratio guaranteed by Christofides on metric instances.
pub const CHRISTOFIDES_RATIO: f64 = 1.5;

/// A closed tour and its length.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tour {
    /// Vertices in visiting order; the first vertex is repeated at the end.
    pub cycle: Vec<VertexId>,
    /// Sum of the weights along the cycle.
    pub length: f64,
    /// Guaranteed ratio to the optimum, when the construction proves one.
    pub approximation_ratio: Option<f64>,
}

/// Dense weight matrix of a complete graph plus the index snapshot it came
/// from.
struct Instance {
    indexed: IndexedGraph,
    weights: Vec<Vec<f64>>,
}

impl Instance {
    /// Reads the weights, rejecting empty, incomplete or negatively weighted
    /// graphs. Directed graphs keep one weight per arc.
    fn load(graph: &Graph, algorithm: &'static str) -> Result<Self> {
        if graph.is_empty() {
            return Err(AlgorithmError::EmptyGraph { algorithm });
        }
        let indexed = graph.indexed();
        let n = indexed.len();
        let mut weights = vec![vec![f64::NAN; n]; n];
        for (v, row) in weights.iter_mut().enumerate() {
            row[v] = 0.0;
        }
        for &(s, t, weight) in indexed.edges() {
            if s == t {
                continue;
            }
            if weight < 0.0 {
                return Err(AlgorithmError::NegativeWeight {
                    algorithm,
                    from: indexed.id(s).clone(),
                    to: indexed.id(t).clone(),
                    weight,
                });
            }
            weights[s][t] = weight;
            if !indexed.is_directed() {
                weights[t][s] = weight;
            }
        }
        for (a, row) in weights.iter().enumerate() {
            if let Some(b) = row.iter().position(|w| w.is_nan()) {
                return Err(AlgorithmError::NotComplete {
                    from: indexed.id(a).clone(),
                    to: indexed.id(b).clone(),
                });
            }
        }
        Ok(Self { indexed, weights })
    }

    /// Fails with the first `(a, b, c)` where going through `b` is shorter
    /// than the direct edge `a`-`c`.
    fn check_metric(&self) -> Result<()> {
        let n = self.weights.len();
        for a in 0..n {
            for c in (a + 1)..n {
                let direct = self.weights[a][c];
                let detour = (0..n)
                    .filter(|&b| b != a && b != c)
                    .find(|&b| direct > self.weights[a][b] + self.weights[b][c] + TRIANGLE_TOLERANCE);
                if let Some(b) = detour {
                    return Err(AlgorithmError::NonMetric {
                        a: self.indexed.id(a).clone(),
                        b: self.indexed.id(b).clone(),
                        c: self.indexed.id(c).clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn length(&self, order: &[usize]) -> f64 {
        order
            .iter()
            .zip(order.iter().cycle().skip(1))
            .map(|(&a, &b)| self.weights[a][b])
            .sum()
    }

    /// Closes `order` into a tour.
    fn tour(&self, order: &[usize], approximation_ratio: Option<f64>) -> Tour {
        let mut cycle: Vec<VertexId> = order.iter().map(|&v| self.indexed.id(v).clone()).collect();
        if let Some(first) = cycle.first().cloned() {
            cycle.push(first);
        }
        Tour {
            cycle,
            length: self.length(order),
            approximation_ratio,
        }
    }
}

/// Christofides tour of an undirected, complete, metric graph.
///
/// The odd-degree vertices of the spanning tree get a minimum-weight perfect
/// matching, so the tour is always within [`CHRISTOFIDES_RATIO`] of the
/// optimum.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`], [`AlgorithmError::DirectedUnsupported`],
/// [`AlgorithmError::NotComplete`] naming a missing pair,
/// [`AlgorithmError::NegativeWeight`], or [`AlgorithmError::NonMetric`] naming
/// a triple that breaks the triangle inequality by more than
/// [`TRIANGLE_TOLERANCE`].
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, tsp::christofides};
///
/// let corners = [(0, 0.0, 0.0), (1, 0.0, 1.0), (2, 1.0, 1.0), (3, 1.0, 0.0)];
/// let mut square = Graph::undirected("square");
/// for &(id, ..) in &corners {
///     square.add_vertex(id, Attributes::new())?;
/// }
/// for (i, &(a, ax, ay)) in corners.iter().enumerate() {
///     for &(b, bx, by) in &corners[i + 1..] {
///         square.add_edge(a, b, f64::hypot(ax - bx, ay - by), Attributes::new())?;
///     }
/// }
/// let tour = christofides(&square)?;
/// assert_eq!(tour.cycle.len(), 5);
/// assert!((tour.length - 4.0).abs() < 1e-9);
/// assert_eq!(tour.approximation_ratio, Some(1.5));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "tsp.christofides",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
pub fn christofides(graph: &Graph) -> Result<Tour> {
    const ALGORITHM: &str = "christofides";
    if graph.is_directed() {
        return Err(AlgorithmError::DirectedUnsupported {
            algorithm: ALGORITHM,
        });
    }
    let instance = Instance::load(graph, ALGORITHM)?;
    instance.check_metric()?;
    let order = christofides_order(&instance.weights);
    Ok(instance.tour(&order, Some(CHRISTOFIDES_RATIO)))
}

/// Genetic-algorithm tour of a complete graph.
///
/// Directed graphs are treated as asymmetric instances: the tour follows arc
/// directions. With a seed in `config` the result is reproducible.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`], [`AlgorithmError::NotComplete`],
/// [`AlgorithmError::NegativeWeight`] or [`AlgorithmError::InvalidParameter`]
/// for an out-of-range setting.
#[instrument(
    name = "tsp.genetic",
    level = "debug",
    err,
    skip(graph, config),
    fields(vertices = graph.vertex_count(), seed = ?config.seed())
)]
pub fn genetic_tour(graph: &Graph, config: GeneticConfig) -> Result<Tour> {
    config.validate()?;
    let instance = Instance::load(graph, "genetic_tsp")?;
    if instance.weights.len() < 2 {
        return Ok(instance.tour(&[0], None));
    }
    let (mut order, _) = genetic::evolve(&instance.weights, &config);
    if let Some(start) = order.iter().position(|&v| v == 0) {
        order.rotate_left(start);
    }
    Ok(instance.tour(&order, None))
}

/// Nearest-neighbour tour: from `start` (or the first vertex) repeatedly move
/// to the closest unvisited vertex, ties going to natural order.
///
/// # Errors
/// Returns [`AlgorithmError::VertexNotFound`] for an unknown `start`, and the
/// completeness and weight errors of [`genetic_tour`].
#[instrument(name = "tsp.nearest_neighbor", level = "debug", err, skip(graph))]
pub fn nearest_neighbor_tour(graph: &Graph, start: Option<&VertexId>) -> Result<Tour> {
    let instance = Instance::load(graph, "nearest_neighbor_tsp")?;
    let first = match start {
        Some(id) => instance
            .indexed
            .index_of(id)
            .ok_or_else(|| AlgorithmError::VertexNotFound { vertex: id.clone() })?,
        None => 0,
    };
    let n = instance.weights.len();
    let mut visited = vec![false; n];
    visited[first] = true;
    let mut order = Vec::with_capacity(n);
    order.push(first);
    let mut current = first;
    while order.len() < n {
        let row = &instance.weights[current];
        let next = (0..n)
            .filter(|&v| !visited[v])
            .min_by(|&a, &b| row[a].total_cmp(&row[b]).then_with(|| a.cmp(&b)))
            .unwrap_or(current);
        visited[next] = true;
        order.push(next);
        current = next;
    }
    Ok(instance.tour(&order, None))
}

/// Length of a closed walk given as consecutive vertices.
///
/// The walk is not required to visit every vertex or to repeat its first
/// vertex at the end.
///
/// # Errors
/// Returns [`AlgorithmError::VertexNotFound`] for an unknown vertex and
/// [`AlgorithmError::NotComplete`] when consecutive vertices are not joined
/// by an edge.
pub fn tour_length(graph: &Graph, cycle: &[VertexId]) -> Result<f64> {
    if let Some(missing) = cycle.iter().find(|v| !graph.contains_vertex(v)) {
        return Err(AlgorithmError::VertexNotFound {
            vertex: missing.clone(),
        });
    }
    cycle
        .windows(2)
        .map(|pair| {
            graph
                .edge(&pair[0], &pair[1])
                .map(crate::graph::Edge::weight)
                .ok_or_else(|| AlgorithmError::NotComplete {
                    from: pair[0].clone(),
                    to: pair[1].clone(),
                })
        })
        .sum()
}

/// Outcome of one method inside a [`TspComparison`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodOutcome {
    /// The method produced a tour.
    Solved {
        /// The tour found.
        tour: Tour,
    },
    /// The method could not run on this graph.
    Failed {
        /// Stable error code, e.g. `ALGORITHM_NON_METRIC`.
        code: &'static str,
        /// Human-readable error message.
        message: String,
    },
}

/// One row of a [`TspComparison`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MethodReport {
    /// Method name: `christofides`, `genetic` or `nearest_neighbor`.
    pub method: &'static str,
    /// Wall time spent in the method, in milliseconds.
    pub elapsed_ms: f64,
    /// Tour or error.
    #[serde(flatten)]
    pub outcome: MethodOutcome,
}

impl MethodReport {
    /// Tour length when the method succeeded.
    #[must_use]
    pub fn length(&self) -> Option<f64> {
        match &self.outcome {
            MethodOutcome::Solved { tour } => Some(tour.length),
            MethodOutcome::Failed { .. } => None,
        }
    }
}

/// Side-by-side results of the TSP constructions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TspComparison {
    /// One report per method, in the order they ran.
    pub reports: Vec<MethodReport>,
}

impl TspComparison {
    /// Report with the shortest tour; ties go to the earlier method.
    #[must_use]
    pub fn best(&self) -> Option<&MethodReport> {
        self.reports
            .iter()
            .filter_map(|report| report.length().map(|length| (report, length)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(report, _)| report)
    }
}

fn timed(method: &'static str, run: impl FnOnce() -> Result<Tour>) -> MethodReport {
    let started = Instant::now();
    let result = run();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let outcome = match result {
        Ok(tour) => MethodOutcome::Solved { tour },
        Err(err) => {
            debug!(method, code = err.code().as_str(), "tsp method failed");
            MethodOutcome::Failed {
                code: err.code().as_str(),
                message: err.to_string(),
            }
        }
    };
    MethodReport {
        method,
        elapsed_ms,
        outcome,
    }
}

/// Runs Christofides, the genetic heuristic and nearest neighbour on the same
/// graph.
///
/// A method that cannot run reports its error code; the others still run.
#[instrument(name = "tsp.compare", level = "debug", skip(graph, genetic))]
#[must_use]
pub fn compare_tsp_methods(graph: &Graph, genetic: GeneticConfig) -> TspComparison {
    TspComparison {
        reports: vec![
            timed("christofides", || christofides(graph)),
            timed("genetic", || genetic_tour(graph, genetic)),
            timed("nearest_neighbor", || nearest_neighbor_tour(graph, None)),
        ],
    }
}

#[cfg(test)]
mod tests;
