//! Subgraph and graph isomorphism by Ullmann's algorithm.
//!
//! A subgraph isomorphism maps pattern vertices injectively onto target
//! vertices so that every pattern edge lands on a target edge (the target may
//! hold extra edges). Pattern and target must share directedness. Self-loops
//! in the pattern must map onto self-loops. Weights and attributes are
//! ignored.
//!
//! Searches are exponential in the worst case and run under a
//! [`SearchBudget`].

mod ullmann;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use self::ullmann::{Search, Structure};
use crate::{
    budget::SearchBudget,
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

/// Pattern vertex to target vertex, in pattern natural order.
pub type VertexMapping = IndexMap<VertexId, VertexId>;

fn check_directedness(pattern: &Graph, target: &Graph) -> Result<()> {
    if pattern.is_directed() == target.is_directed() {
        Ok(())
    } else {
        Err(AlgorithmError::invalid_parameter(
            "pattern",
            "pattern and target must both be directed or both undirected",
        ))
    }
}

fn to_mapping(
    pattern: &IndexedGraph,
    target: &IndexedGraph,
    positions: &[Option<usize>],
) -> VertexMapping {
    positions
        .iter()
        .enumerate()
        .filter_map(|(p, t)| t.map(|t| (pattern.id(p).clone(), target.id(t).clone())))
        .collect()
}

fn search(
    pattern: &Graph,
    target: &Graph,
    budget: SearchBudget,
    algorithm: &'static str,
    cap: Option<usize>,
) -> Result<Vec<VertexMapping>> {
    check_directedness(pattern, target)?;
    let mut found = Vec::new();
    if cap == Some(0) || pattern.vertex_count() > target.vertex_count() {
        return Ok(found);
    }
    let (pattern_index, target_index) = (pattern.indexed(), target.indexed());
    let (pattern_shape, target_shape) = (
        Structure::new(&pattern_index),
        Structure::new(&target_index),
    );
    let mut meter = budget.start(algorithm);
    Search::new(&pattern_shape, &target_shape).run(&mut meter, |positions| {
        found.push(to_mapping(&pattern_index, &target_index, positions));
        cap.is_none_or(|limit| found.len() < limit)
    })?;
    debug!(mappings = found.len(), explored = meter.explored(), "isomorphism search finished");
    Ok(found)
}

/// Finds the first embedding of `pattern` into `target`.
///
/// Returns `Ok(None)` when the search proves no embedding exists.
///
/// # Errors
/// Returns [`AlgorithmError::InvalidParameter`] when the graphs differ in
/// directedness and [`AlgorithmError::SearchBudgetExceeded`] or
/// [`AlgorithmError::DeadlineExceeded`] when `budget` runs out.
///
/// # Examples
/// ```
/// use grafo_core::{
///     Attributes, Graph, SearchBudget, VertexId, isomorphism::find_subgraph_isomorphism,
/// };
///
/// let mut square = Graph::undirected("square");
/// for id in 0..4 {
///     square.add_vertex(id, Attributes::new())?;
/// }
/// for id in 0..4 {
///     square.add_edge(id, (id + 1) % 4, 1.0, Attributes::new())?;
/// }
/// let mut edge = Graph::undirected("edge");
/// edge.add_vertex("u", Attributes::new())?;
/// edge.add_vertex("v", Attributes::new())?;
/// edge.add_edge("u", "v", 1.0, Attributes::new())?;
///
/// let mapping = find_subgraph_isomorphism(&edge, &square, SearchBudget::default())?
///     .expect("an edge embeds into a cycle");
/// let (u, v) = (&mapping[&VertexId::from("u")], &mapping[&VertexId::from("v")]);
/// assert!(square.has_edge(u, v));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "isomorphism.find",
    level = "debug",
    err,
    skip(pattern, target, budget),
    fields(pattern = pattern.vertex_count(), target = target.vertex_count())
)]
pub fn find_subgraph_isomorphism(
    pattern: &Graph,
    target: &Graph,
    budget: SearchBudget,
) -> Result<Option<VertexMapping>> {
    let found = search(pattern, target, budget, "subgraph_isomorphism", Some(1))?;
    Ok(found.into_iter().next())
}

/// Enumerates embeddings of `pattern` into `target`, stopping after `cap`
/// mappings when one is given.
///
/// Mappings are produced in search order, which is deterministic for a given
/// pair of graphs.
///
/// # Errors
/// As [`find_subgraph_isomorphism`]. Exhausting the budget discards the
/// mappings found so far.
#[instrument(
    name = "isomorphism.enumerate",
    level = "debug",
    err,
    skip(pattern, target, budget),
    fields(pattern = pattern.vertex_count(), target = target.vertex_count())
)]
pub fn enumerate_subgraph_isomorphisms(
    pattern: &Graph,
    target: &Graph,
    cap: Option<usize>,
    budget: SearchBudget,
) -> Result<Vec<VertexMapping>> {
    search(pattern, target, budget, "subgraph_isomorphism", cap)
}

/// Sorted degree signature: `(out, in)` for directed graphs, `(degree, 0)`
/// otherwise. Self-loops count once on each side.
fn degree_sequence(indexed: &IndexedGraph) -> Vec<(usize, usize)> {
    let mut degrees: Vec<(usize, usize)> = (0..indexed.len())
        .map(|v| {
            if indexed.is_directed() {
                (indexed.outgoing(v).len(), indexed.incoming(v).len())
            } else {
                (indexed.outgoing(v).len(), 0)
            }
        })
        .collect();
    degrees.sort_unstable();
    degrees
}

/// Finds a bijection between `left` and `right` preserving adjacency.
///
/// Vertex counts, edge counts and degree sequences are compared before any
/// search runs.
///
/// # Errors
/// Returns [`AlgorithmError::SearchBudgetExceeded`] or
/// [`AlgorithmError::DeadlineExceeded`] when `budget` runs out.
#[instrument(name = "isomorphism.isomorphic", level = "debug", err, skip_all)]
pub fn find_isomorphism(
    left: &Graph,
    right: &Graph,
    budget: SearchBudget,
) -> Result<Option<VertexMapping>> {
    if left.is_directed() != right.is_directed()
        || left.vertex_count() != right.vertex_count()
        || left.edge_count() != right.edge_count()
    {
        return Ok(None);
    }
    if degree_sequence(&left.indexed()) != degree_sequence(&right.indexed()) {
        debug!("degree sequences differ");
        return Ok(None);
    }
    // Equal vertex and edge counts make any edge-preserving injection a
    // bijection on both sets.
    let found = search(left, right, budget, "isomorphism", Some(1))?;
    Ok(found.into_iter().next())
}

/// Returns `true` when the graphs are isomorphic.
///
/// # Errors
/// As [`find_isomorphism`].
pub fn are_isomorphic(left: &Graph, right: &Graph, budget: SearchBudget) -> Result<bool> {
    find_isomorphism(left, right, budget).map(|mapping| mapping.is_some())
}

#[cfg(test)]
mod tests;
