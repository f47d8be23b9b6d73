//! Minimum spanning trees of connected undirected graphs.
//!
//! [`kruskal`] and [`prim`] agree on the total weight; with tied weights they
//! may pick different edges. Negative weights are allowed and self-loops are
//! ignored.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
    union_find::DisjointSet,
};

/// Spanning tree construction.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanningTreeMethod {
    /// Cheapest edges first, joining separate trees.
    #[default]
    Kruskal,
    /// Grows one tree from a root.
    Prim,
}

impl SpanningTreeMethod {
    /// Stable name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kruskal => "kruskal",
            Self::Prim => "prim",
        }
    }
}

impl fmt::Display for SpanningTreeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpanningTreeMethod {
    type Err = AlgorithmError;

    fn from_str(raw: &str) -> Result<Self> {
        [Self::Kruskal, Self::Prim]
            .into_iter()
            .find(|method| method.as_str() == raw)
            .ok_or_else(|| {
                AlgorithmError::invalid_parameter(
                    "method",
                    format!("unknown spanning tree method `{raw}`"),
                )
            })
    }
}

/// Edge of a spanning tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeEdge {
    /// Endpoint already in the tree (Prim) or the stored source (Kruskal).
    pub source: VertexId,
    /// The other endpoint.
    pub target: VertexId,
    /// Edge weight.
    pub weight: f64,
}

/// A spanning tree and its weight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpanningTree {
    /// Method that built the tree.
    pub method: SpanningTreeMethod,
    /// `n - 1` edges in the order they were accepted.
    pub edges: Vec<TreeEdge>,
    /// Sum of the edge weights.
    pub total_weight: f64,
}

fn checked(graph: &Graph, algorithm: &'static str) -> Result<IndexedGraph> {
    if graph.is_directed() {
        return Err(AlgorithmError::DirectedUnsupported { algorithm });
    }
    if graph.is_empty() {
        return Err(AlgorithmError::EmptyGraph { algorithm });
    }
    Ok(graph.indexed())
}

fn assemble(
    indexed: &IndexedGraph,
    method: SpanningTreeMethod,
    accepted: &[(usize, usize, f64)],
) -> SpanningTree {
    let edges: Vec<TreeEdge> = accepted
        .iter()
        .map(|&(s, t, weight)| TreeEdge {
            source: indexed.id(s).clone(),
            target: indexed.id(t).clone(),
            weight,
        })
        .collect();
    let total_weight = edges.iter().map(|edge| edge.weight).sum();
    debug!(%method, edges = edges.len(), total_weight, "spanning tree built");
    SpanningTree {
        method,
        edges,
        total_weight,
    }
}

/// Kruskal's algorithm. Equal weights are taken in edge insertion order.
///
/// # Errors
/// Returns [`AlgorithmError::DirectedUnsupported`],
/// [`AlgorithmError::EmptyGraph`] or [`AlgorithmError::Disconnected`] naming
/// the first vertex outside the tree of the first vertex.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, spanning_tree::kruskal};
///
/// let mut graph = Graph::undirected("square");
/// for id in ["a", "b", "c", "d"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// for (s, t, w) in [("a", "b", 1.0), ("b", "c", 4.0), ("c", "d", 2.0), ("d", "a", 3.0)] {
///     graph.add_edge(s, t, w, Attributes::new())?;
/// }
/// let tree = kruskal(&graph)?;
/// assert_eq!(tree.edges.len(), 3);
/// assert_eq!(tree.total_weight, 6.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "spanning_tree.kruskal",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn kruskal(graph: &Graph) -> Result<SpanningTree> {
    let indexed = checked(graph, "kruskal")?;
    let mut candidates: Vec<(usize, usize, f64)> = indexed
        .edges()
        .iter()
        .copied()
        .filter(|&(s, t, _)| s != t)
        .collect();
    candidates.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut forest = DisjointSet::new(indexed.len());
    let mut accepted = Vec::with_capacity(indexed.len().saturating_sub(1));
    for (s, t, weight) in candidates {
        if forest.union(s, t) {
            accepted.push((s, t, weight));
            if forest.set_count() == 1 {
                break;
            }
        }
    }
    if forest.set_count() > 1 {
        let root = forest.find(0);
        if let Some(stray) = (1..indexed.len()).find(|&v| forest.find(v) != root) {
            return Err(AlgorithmError::Disconnected {
                algorithm: "kruskal",
                vertex: indexed.id(stray).clone(),
            });
        }
    }
    Ok(assemble(&indexed, SpanningTreeMethod::Kruskal, &accepted))
}

/// Frontier edge ordered by weight, then by discovery.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    weight: f64,
    sequence: usize,
    from: usize,
    to: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Min-heap of edges leaving the tree.
struct Frontier<'a> {
    indexed: &'a IndexedGraph,
    heap: BinaryHeap<Reverse<Candidate>>,
    sequence: usize,
}

impl Frontier<'_> {
    /// Adds `vertex` to the tree and offers its edges to outside vertices.
    fn enter(&mut self, vertex: usize, in_tree: &mut [bool]) {
        in_tree[vertex] = true;
        for neighbour in self.indexed.outgoing(vertex) {
            if !in_tree[neighbour.index] {
                self.heap.push(Reverse(Candidate {
                    weight: neighbour.weight,
                    sequence: self.sequence,
                    from: vertex,
                    to: neighbour.index,
                }));
                self.sequence += 1;
            }
        }
    }
}

/// Prim's algorithm grown from `root`, or from the first vertex.
///
/// # Errors
/// Returns [`AlgorithmError::VertexNotFound`] for an unknown root and the
/// errors of [`kruskal`], with the unreachable vertex named relative to the
/// root.
#[instrument(
    name = "spanning_tree.prim",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn prim(graph: &Graph, root: Option<&VertexId>) -> Result<SpanningTree> {
    let indexed = checked(graph, "prim")?;
    let start = match root {
        Some(id) => indexed
            .index_of(id)
            .ok_or_else(|| AlgorithmError::VertexNotFound { vertex: id.clone() })?,
        None => 0,
    };
    let n = indexed.len();
    let mut in_tree = vec![false; n];
    let mut accepted = Vec::with_capacity(n.saturating_sub(1));
    let mut grow = Frontier {
        indexed: &indexed,
        heap: BinaryHeap::new(),
        sequence: 0,
    };
    grow.enter(start, &mut in_tree);
    while let Some(Reverse(candidate)) = grow.heap.pop() {
        if in_tree[candidate.to] {
            continue;
        }
        accepted.push((candidate.from, candidate.to, candidate.weight));
        grow.enter(candidate.to, &mut in_tree);
        if accepted.len() + 1 == n {
            break;
        }
    }
    if let Some(stray) = in_tree.iter().position(|&reached| !reached) {
        return Err(AlgorithmError::Disconnected {
            algorithm: "prim",
            vertex: indexed.id(stray).clone(),
        });
    }
    Ok(assemble(&indexed, SpanningTreeMethod::Prim, &accepted))
}

/// Minimum spanning tree by the chosen method; Prim starts from the first
/// vertex.
///
/// # Errors
/// Returns the errors of [`kruskal`] or [`prim`].
pub fn minimum_spanning_tree(graph: &Graph, method: SpanningTreeMethod) -> Result<SpanningTree> {
    match method {
        SpanningTreeMethod::Kruskal => kruskal(graph),
        SpanningTreeMethod::Prim => prim(graph, None),
    }
}
