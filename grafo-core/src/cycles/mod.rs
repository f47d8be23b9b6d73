//! Eulerian walks and Hamiltonian cycles.
//!
//! Eulerian walks come from Hierholzer's algorithm after a degree and
//! connectivity check; a failed check names the offending vertex. Walks list
//! vertices in visiting order and repeat the start at the end of a circuit.
//! Self-loops are traversed like any other edge.

mod eulerian;
mod hamiltonian;

use std::collections::HashSet;

use tracing::{debug, instrument};

pub use self::eulerian::EulerianKind;
use self::eulerian::{Shape, classify, first_touched, has_edges, hierholzer, not_eulerian};
use crate::{
    budget::SearchBudget,
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

fn resolve(indexed: &IndexedGraph, id: &VertexId) -> Result<usize> {
    indexed
        .index_of(id)
        .ok_or_else(|| AlgorithmError::VertexNotFound { vertex: id.clone() })
}

/// Classifies the graph without building a walk.
///
/// Undirected graphs need every vertex of even degree for a circuit, or
/// exactly two odd vertices for a path. Directed graphs need balanced in and
/// out degrees, or one vertex with one surplus outgoing arc and one with one
/// surplus incoming arc. In both cases all edges must share one (weak)
/// component.
#[must_use]
pub fn eulerian_kind(graph: &Graph) -> EulerianKind {
    classify(&graph.indexed()).kind()
}

/// Eulerian circuit starting and ending at `start`, or at the first vertex
/// with an incident edge.
///
/// A graph without edges yields an empty walk.
///
/// # Errors
/// Returns [`AlgorithmError::NotEulerian`] citing an odd or unbalanced vertex
/// or a vertex outside the component holding the other edges,
/// [`AlgorithmError::VertexNotFound`] for an unknown `start` and
/// [`AlgorithmError::InvalidParameter`] when `start` has no incident edges.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, VertexId, cycles::eulerian_circuit};
///
/// let mut bowtie = Graph::undirected("bowtie");
/// for id in ["a", "b", "c", "d", "e"] {
///     bowtie.add_vertex(id, Attributes::new())?;
/// }
/// for (s, t) in [("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "e"), ("e", "c")] {
///     bowtie.add_edge(s, t, 1.0, Attributes::new())?;
/// }
/// let walk = eulerian_circuit(&bowtie, None)?;
/// assert_eq!(walk.len(), 7);
/// assert_eq!(walk.first(), Some(&VertexId::from("a")));
/// assert_eq!(walk.first(), walk.last());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "cycles.eulerian_circuit",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn eulerian_circuit(graph: &Graph, start: Option<&VertexId>) -> Result<Vec<VertexId>> {
    let indexed = graph.indexed();
    let start = start.map(|id| resolve(&indexed, id)).transpose()?;
    match classify(&indexed) {
        Shape::Edgeless => Ok(Vec::new()),
        Shape::Path {
            start: vertex,
            reason,
        }
        | Shape::Broken { vertex, reason } => Err(not_eulerian(&indexed, vertex, reason)),
        Shape::Circuit => {
            let origin = match start {
                Some(origin) if !has_edges(&indexed, origin) => {
                    return Err(AlgorithmError::invalid_parameter(
                        "start",
                        format!("vertex `{}` has no incident edges", indexed.id(origin)),
                    ));
                }
                Some(origin) => origin,
                None => first_touched(&indexed).unwrap_or(0),
            };
            hierholzer(&indexed, origin)
        }
    }
}

/// Eulerian path of a graph, open when the graph has odd (or unbalanced)
/// vertices and closed when it has a circuit.
///
/// Open paths start at the first odd-degree vertex in natural order, or at
/// the vertex whose out-degree exceeds its in-degree.
///
/// # Errors
/// Returns [`AlgorithmError::NotEulerian`] when neither a path nor a circuit
/// exists.
#[instrument(
    name = "cycles.eulerian_path",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn eulerian_path(graph: &Graph) -> Result<Vec<VertexId>> {
    let indexed = graph.indexed();
    match classify(&indexed) {
        Shape::Edgeless => Ok(Vec::new()),
        Shape::Circuit => hierholzer(&indexed, first_touched(&indexed).unwrap_or(0)),
        Shape::Path { start, .. } => hierholzer(&indexed, start),
        Shape::Broken { vertex, reason } => Err(not_eulerian(&indexed, vertex, reason)),
    }
}

/// Searches for a Hamiltonian cycle, returned closed and starting at the
/// first vertex.
///
/// Undirected graphs need at least three vertices and directed graphs at
/// least two; smaller graphs have no cycle. Self-loops and parallel
/// directions are ignored. The search is exponential and ticks `budget` once
/// per path extension.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph and
/// [`AlgorithmError::SearchBudgetExceeded`] or
/// [`AlgorithmError::DeadlineExceeded`] when the budget runs out.
#[instrument(
    name = "cycles.hamiltonian",
    level = "debug",
    err,
    skip(graph, budget),
    fields(vertices = graph.vertex_count())
)]
pub fn hamiltonian_cycle(graph: &Graph, budget: SearchBudget) -> Result<Option<Vec<VertexId>>> {
    if graph.is_empty() {
        return Err(AlgorithmError::EmptyGraph {
            algorithm: "hamiltonian_cycle",
        });
    }
    let indexed = graph.indexed();
    let mut meter = budget.start("hamiltonian_cycle");
    let found = hamiltonian::search(&indexed, &mut meter)?;
    debug!(found = found.is_some(), explored = meter.explored(), "hamiltonian search finished");
    Ok(found.map(|order| {
        order
            .iter()
            .chain(order.first())
            .map(|&v| indexed.id(v).clone())
            .collect()
    }))
}

/// Checks that `cycle` is a closed walk visiting every vertex exactly once.
///
/// # Errors
/// Returns [`AlgorithmError::InvalidSolution`] naming the first offending
/// vertex and [`AlgorithmError::VertexNotFound`] for unknown vertices.
pub fn verify_hamiltonian_cycle(graph: &Graph, cycle: &[VertexId]) -> Result<()> {
    const WHAT: &str = "hamiltonian cycle";
    let invalid = |vertex: &VertexId, reason: String| AlgorithmError::InvalidSolution {
        what: WHAT,
        vertex: vertex.clone(),
        reason: reason.into(),
    };
    if let Some(unknown) = cycle.iter().find(|v| !graph.contains_vertex(v)) {
        return Err(AlgorithmError::VertexNotFound {
            vertex: unknown.clone(),
        });
    }
    let (Some(first), Some(last)) = (cycle.first(), cycle.last()) else {
        return match graph.vertices().next() {
            Some(vertex) => Err(invalid(vertex, "cycle is empty".to_owned())),
            None => Ok(()),
        };
    };
    if first != last || cycle.len() < 2 {
        return Err(invalid(last, format!("cycle must end where it starts, at `{first}`")));
    }
    let mut seen = HashSet::with_capacity(cycle.len());
    for vertex in &cycle[..cycle.len() - 1] {
        if !seen.insert(vertex) {
            return Err(invalid(vertex, "visited twice".to_owned()));
        }
    }
    if let Some(missing) = graph.vertices().find(|v| !seen.contains(v)) {
        return Err(invalid(missing, "never visited".to_owned()));
    }
    for pair in cycle.windows(2) {
        if !graph.has_edge(&pair[0], &pair[1]) {
            return Err(invalid(&pair[0], format!("no edge to `{}`", pair[1])));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
