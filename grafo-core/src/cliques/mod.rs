//! Maximal cliques, maximum clique and clique number.
//!
//! Everything runs on the underlying simple undirected graph: self-loops are
//! dropped and a directed graph contributes an undirected edge for every arc.
//! Enumeration is exponential in the worst case and runs under a
//! [`SearchBudget`].

mod bron_kerbosch;

use tracing::{debug, instrument};

use crate::{
    budget::SearchBudget,
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

/// Sorts cliques by descending size, then lexicographically by natural
/// order, and resolves their ids.
fn ordered(indexed: &IndexedGraph, mut cliques: Vec<Vec<usize>>) -> Vec<Vec<VertexId>> {
    cliques.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    cliques
        .into_iter()
        .map(|clique| clique.into_iter().map(|v| indexed.id(v).clone()).collect())
        .collect()
}

/// Every maximal clique, vertices in natural order, largest cliques first
/// and equal sizes ordered lexicographically by natural position.
///
/// Isolated vertices form singleton cliques. An empty graph has none.
///
/// # Errors
/// Returns [`AlgorithmError::SearchBudgetExceeded`] or
/// [`AlgorithmError::DeadlineExceeded`] when `budget` runs out.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, SearchBudget, VertexId, cliques::maximal_cliques};
///
/// let mut graph = Graph::undirected("kite");
/// for id in ["a", "b", "c", "d"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// for (s, t) in [("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")] {
///     graph.add_edge(s, t, 1.0, Attributes::new())?;
/// }
/// let cliques = maximal_cliques(&graph, SearchBudget::default())?;
/// let names: Vec<Vec<String>> = cliques
///     .iter()
///     .map(|clique| clique.iter().map(VertexId::to_string).collect())
///     .collect();
/// assert_eq!(names, vec![vec!["a", "b", "c"], vec!["c", "d"]]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "cliques.maximal",
    level = "debug",
    err,
    skip(graph, budget),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn maximal_cliques(graph: &Graph, budget: SearchBudget) -> Result<Vec<Vec<VertexId>>> {
    let indexed = graph.indexed();
    let mut meter = budget.start("bron_kerbosch");
    let cliques = bron_kerbosch::enumerate(&indexed.simple_adjacency(), &mut meter)?;
    debug!(cliques = cliques.len(), explored = meter.explored(), "maximal cliques enumerated");
    Ok(ordered(&indexed, cliques))
}

/// A largest clique: the first clique of [`maximal_cliques`]. Empty for an
/// empty graph.
///
/// # Errors
/// As [`maximal_cliques`].
pub fn maximum_clique(graph: &Graph, budget: SearchBudget) -> Result<Vec<VertexId>> {
    Ok(maximal_cliques(graph, budget)?
        .into_iter()
        .next()
        .unwrap_or_default())
}

/// Size of the largest clique.
///
/// # Errors
/// As [`maximal_cliques`].
pub fn clique_number(graph: &Graph, budget: SearchBudget) -> Result<usize> {
    maximum_clique(graph, budget).map(|clique| clique.len())
}

/// Returns `true` when every pair of the given vertices is adjacent, in either
/// direction for directed graphs. Repeated vertices are ignored.
///
/// # Errors
/// Returns [`AlgorithmError::VertexNotFound`] for an unknown vertex.
pub fn is_clique(graph: &Graph, vertices: &[VertexId]) -> Result<bool> {
    if let Some(unknown) = vertices.iter().find(|v| !graph.contains_vertex(v)) {
        return Err(AlgorithmError::VertexNotFound {
            vertex: unknown.clone(),
        });
    }
    Ok(vertices.iter().enumerate().all(|(i, a)| {
        vertices[i + 1..]
            .iter()
            .all(|b| a == b || graph.has_edge(a, b) || graph.has_edge(b, a))
    }))
}
