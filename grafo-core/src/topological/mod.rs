//! Topological ordering of directed acyclic graphs.
//!
//! Kahn's algorithm with a FIFO ready queue seeded in natural vertex order, so
//! the order is deterministic. All operations reject undirected graphs with
//! [`AlgorithmError::UndirectedUnsupported`].

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

/// Vertex attribute read by [`critical_path`] unless another key is given.
pub const DURATION_KEY: &str = "duration";

fn require_directed(graph: &Graph, algorithm: &'static str) -> Result<()> {
    if graph.is_directed() {
        Ok(())
    } else {
        Err(AlgorithmError::UndirectedUnsupported { algorithm })
    }
}

/// Kahn order as indices, or the first vertex (natural order) left with
/// positive in-degree.
fn kahn(indexed: &IndexedGraph) -> std::result::Result<Vec<usize>, usize> {
    let n = indexed.len();
    let mut in_degree: Vec<usize> = (0..n).map(|v| indexed.incoming(v).len()).collect();
    let mut ready: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(v) = ready.pop_front() {
        order.push(v);
        for neighbor in indexed.outgoing(v) {
            in_degree[neighbor.index] -= 1;
            if in_degree[neighbor.index] == 0 {
                ready.push_back(neighbor.index);
            }
        }
    }
    if order.len() == n {
        Ok(order)
    } else {
        Err((0..n).find(|&v| in_degree[v] > 0).unwrap_or(0))
    }
}

fn ordered_indices(graph: &Graph, indexed: &IndexedGraph) -> Result<Vec<usize>> {
    kahn(indexed).map_err(|stuck| {
        debug!(graph = graph.name(), "cycle blocks topological order");
        AlgorithmError::CycleDetected {
            vertex: indexed.id(stuck).clone(),
        }
    })
}

/// Vertices in an order where every arc points forward.
///
/// # Errors
/// Returns [`AlgorithmError::UndirectedUnsupported`] for undirected graphs and
/// [`AlgorithmError::CycleDetected`] citing a vertex still holding incoming
/// arcs when the queue ran dry. A self-loop is a cycle.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, VertexId, topological::topological_sort};
///
/// let mut graph = Graph::directed("build");
/// for id in ["link", "compile", "fetch"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge("fetch", "compile", 1.0, Attributes::new())?;
/// graph.add_edge("compile", "link", 1.0, Attributes::new())?;
/// let order = topological_sort(&graph)?;
/// let names: Vec<String> = order.iter().map(VertexId::to_string).collect();
/// assert_eq!(names, ["fetch", "compile", "link"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "topological.sort",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn topological_sort(graph: &Graph) -> Result<Vec<VertexId>> {
    require_directed(graph, "topological_sort")?;
    let indexed = graph.indexed();
    let order = ordered_indices(graph, &indexed)?;
    Ok(order.into_iter().map(|v| indexed.id(v).clone()).collect())
}

/// Returns `true` for a directed graph without cycles.
///
/// # Errors
/// Returns [`AlgorithmError::UndirectedUnsupported`] for undirected graphs.
pub fn is_dag(graph: &Graph) -> Result<bool> {
    require_directed(graph, "is_dag")?;
    Ok(kahn(&graph.indexed()).is_ok())
}

/// Checks a caller-supplied order: every vertex exactly once and every arc
/// pointing forward.
///
/// # Errors
/// Returns [`AlgorithmError::UndirectedUnsupported`] for undirected graphs,
/// [`AlgorithmError::VertexNotFound`] for an unknown vertex and
/// [`AlgorithmError::InvalidSolution`] naming the first offending vertex.
pub fn verify_topological_order(graph: &Graph, order: &[VertexId]) -> Result<()> {
    const WHAT: &str = "topological order";
    require_directed(graph, "verify_topological_order")?;
    let invalid = |vertex: &VertexId, reason: String| AlgorithmError::InvalidSolution {
        what: WHAT,
        vertex: vertex.clone(),
        reason: reason.into(),
    };
    let mut position = HashMap::with_capacity(order.len());
    for (index, vertex) in order.iter().enumerate() {
        if !graph.contains_vertex(vertex) {
            return Err(AlgorithmError::VertexNotFound {
                vertex: vertex.clone(),
            });
        }
        if position.insert(vertex, index).is_some() {
            return Err(invalid(vertex, "listed twice".to_owned()));
        }
    }
    if let Some(missing) = graph.vertices().find(|v| !position.contains_key(v)) {
        return Err(invalid(missing, "not listed".to_owned()));
    }
    for edge in graph.edges() {
        if position[edge.source()] >= position[edge.target()] {
            return Err(invalid(
                edge.source(),
                format!("arc to `{}` points backwards", edge.target()),
            ));
        }
    }
    Ok(())
}

/// Longest chain of dependent tasks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CriticalPath {
    /// Vertices from the first task to the last.
    pub path: Vec<VertexId>,
    /// Sum of the durations along `path`.
    pub duration: f64,
}

fn durations(graph: &Graph, indexed: &IndexedGraph, key: &str) -> Result<Vec<f64>> {
    indexed
        .ids()
        .iter()
        .map(|id| {
            let invalid = |reason: &str| AlgorithmError::InvalidAttribute {
                vertex: id.clone(),
                key: key.into(),
                reason: reason.into(),
            };
            let attributes = graph
                .vertex_attributes(id)
                .map_err(|_| AlgorithmError::VertexNotFound { vertex: id.clone() })?;
            match attributes.get(key) {
                None => Ok(0.0),
                Some(value) => {
                    let duration = value.as_f64().ok_or_else(|| invalid("not numeric"))?;
                    if duration.is_finite() && duration >= 0.0 {
                        Ok(duration)
                    } else {
                        Err(invalid("must be finite and non-negative"))
                    }
                }
            }
        })
        .collect()
}

/// Longest path where each vertex costs the numeric attribute `key`
/// (usually [`DURATION_KEY`]); vertices without it cost zero. Edge weights are
/// ignored.
///
/// Ties keep the earliest candidate in topological order. An empty graph has
/// an empty path of duration zero.
///
/// # Errors
/// Returns [`AlgorithmError::UndirectedUnsupported`],
/// [`AlgorithmError::CycleDetected`], and
/// [`AlgorithmError::InvalidAttribute`] for a non-numeric, negative or
/// non-finite duration.
#[instrument(
    name = "topological.critical_path",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn critical_path(graph: &Graph, key: &str) -> Result<CriticalPath> {
    require_directed(graph, "critical_path")?;
    let indexed = graph.indexed();
    let cost = durations(graph, &indexed, key)?;
    let order = ordered_indices(graph, &indexed)?;

    let mut finish = cost.clone();
    let mut previous: Vec<Option<usize>> = vec![None; indexed.len()];
    for &v in &order {
        for neighbor in indexed.outgoing(v) {
            let w = neighbor.index;
            let candidate = finish[v] + cost[w];
            if candidate > finish[w] {
                finish[w] = candidate;
                previous[w] = Some(v);
            }
        }
    }
    let Some(&last) = order
        .iter()
        .reduce(|best, v| if finish[*v] > finish[*best] { v } else { best })
    else {
        return Ok(CriticalPath {
            path: Vec::new(),
            duration: 0.0,
        });
    };
    let mut path = vec![last];
    while let Some(before) = previous[path[path.len() - 1]] {
        path.push(before);
    }
    path.reverse();
    debug!(length = path.len(), duration = finish[last], "critical path found");
    Ok(CriticalPath {
        path: path.into_iter().map(|v| indexed.id(v).clone()).collect(),
        duration: finish[last],
    })
}
