//! Maximum bipartite matching.
//!
//! [`hopcroft_karp`] matches across either a caller-declared [`Bipartition`]
//! or one inferred by BFS 2-colouring. Directed graphs are matched on their
//! underlying undirected graph.

mod hopcroft_karp;

use std::collections::VecDeque;

use serde::Serialize;
use tracing::instrument;

pub use self::hopcroft_karp::{MatchedPair, Matching, hopcroft_karp};
use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

/// Split of the vertex set into two sides with every edge crossing.
///
/// Construction does not consult a graph; [`Bipartition::validate`] checks a
/// declared split against one.
///
/// # Examples
/// ```
/// use grafo_core::matching::Bipartition;
///
/// let split = Bipartition::new(vec![1.into(), 2.into()], vec!["x".into()]);
/// assert_eq!(split.left().len(), 2);
/// assert_eq!(split.right(), &["x".into()]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bipartition {
    left: Vec<VertexId>,
    right: Vec<VertexId>,
}

/// Which side of a bipartition a vertex lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl Bipartition {
    /// Declares a bipartition.
    #[must_use]
    pub const fn new(left: Vec<VertexId>, right: Vec<VertexId>) -> Self {
        Self { left, right }
    }

    /// Left side, in the order it was declared or discovered.
    #[must_use]
    pub fn left(&self) -> &[VertexId] {
        &self.left
    }

    /// Right side, in the order it was declared or discovered.
    #[must_use]
    pub fn right(&self) -> &[VertexId] {
        &self.right
    }

    /// Checks that the sides are disjoint, cover every vertex of `graph` and
    /// that every edge crosses between them.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::VertexNotFound`] for a listed vertex missing
    /// from the graph and [`AlgorithmError::InvalidBipartition`] naming the
    /// first vertex that breaks one of the conditions.
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        self.sides(&graph.indexed()).map(|_| ())
    }

    /// Side of every vertex of `indexed`, by position.
    pub(crate) fn sides(&self, indexed: &IndexedGraph) -> Result<Vec<Side>> {
        let mut sides: Vec<Option<Side>> = vec![None; indexed.len()];
        let declared = self
            .left
            .iter()
            .map(|id| (id, Side::Left))
            .chain(self.right.iter().map(|id| (id, Side::Right)));
        for (id, side) in declared {
            let position = indexed
                .index_of(id)
                .ok_or_else(|| AlgorithmError::VertexNotFound { vertex: id.clone() })?;
            match sides[position] {
                None => sides[position] = Some(side),
                Some(existing) if existing == side => {
                    return Err(invalid(id, "listed twice on the same side"));
                }
                Some(_) => return Err(invalid(id, "listed on both sides")),
            }
        }
        let mut resolved = Vec::with_capacity(sides.len());
        for (position, side) in sides.into_iter().enumerate() {
            let side = side.ok_or_else(|| invalid(indexed.id(position), "on neither side"))?;
            resolved.push(side);
        }
        for &(s, t, _) in indexed.edges() {
            if resolved[s] == resolved[t] {
                return Err(invalid(
                    indexed.id(s),
                    format!("edge to `{}` stays on one side", indexed.id(t)),
                ));
            }
        }
        Ok(resolved)
    }
}

fn invalid(vertex: &VertexId, reason: impl Into<std::sync::Arc<str>>) -> AlgorithmError {
    AlgorithmError::InvalidBipartition {
        vertex: vertex.clone(),
        reason: reason.into(),
    }
}

/// BFS 2-colouring over every component, started from each uncoloured
/// vertex in natural order; each start vertex goes on the left side.
pub(crate) fn two_colour(indexed: &IndexedGraph) -> Result<Vec<Side>> {
    if let Some(vertex) = indexed.first_self_loop() {
        return Err(AlgorithmError::NotBipartite {
            vertex: indexed.id(vertex).clone(),
        });
    }
    let adjacency = indexed.simple_adjacency();
    let mut sides: Vec<Option<Side>> = vec![None; indexed.len()];
    for start in 0..indexed.len() {
        if sides[start].is_some() {
            continue;
        }
        sides[start] = Some(Side::Left);
        let mut queue = VecDeque::from([start]);
        while let Some(vertex) = queue.pop_front() {
            let side = sides[vertex].unwrap_or(Side::Left);
            for &neighbour in &adjacency[vertex] {
                match sides[neighbour] {
                    None => {
                        sides[neighbour] = Some(side.opposite());
                        queue.push_back(neighbour);
                    }
                    Some(other) if other == side => {
                        return Err(AlgorithmError::NotBipartite {
                            vertex: indexed.id(neighbour).clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
    }
    Ok(sides.into_iter().map(|side| side.unwrap_or(Side::Left)).collect())
}

/// Infers a bipartition by BFS 2-colouring.
///
/// Components are coloured from their first vertex in natural order, which is
/// placed on the left. Isolated vertices therefore land on the left side.
///
/// # Errors
/// Returns [`AlgorithmError::NotBipartite`] citing the vertex where an odd
/// cycle (or self-loop) was detected.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, matching::bipartition};
///
/// let mut graph = Graph::undirected("path");
/// for id in ["a", "b", "c"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge("a", "b", 1.0, Attributes::new())?;
/// graph.add_edge("b", "c", 1.0, Attributes::new())?;
/// let split = bipartition(&graph)?;
/// assert_eq!(split.left(), &["a".into(), "c".into()]);
/// assert_eq!(split.right(), &["b".into()]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "matching.bipartition",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
pub fn bipartition(graph: &Graph) -> Result<Bipartition> {
    let indexed = graph.indexed();
    let sides = two_colour(&indexed)?;
    let (left, right): (Vec<usize>, Vec<usize>) =
        (0..indexed.len()).partition(|&v| sides[v] == Side::Left);
    let ids = |side: Vec<usize>| -> Vec<VertexId> {
        side.into_iter().map(|v| indexed.id(v).clone()).collect()
    };
    Ok(Bipartition::new(ids(left), ids(right)))
}

/// Returns `true` when the graph admits a 2-colouring.
#[must_use]
pub fn is_bipartite(graph: &Graph) -> bool {
    two_colour(&graph.indexed()).is_ok()
}

#[cfg(test)]
mod tests;
