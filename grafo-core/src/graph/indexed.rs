//! Dense, index-based snapshot of a [`Graph`].
//!
//! Algorithms translate identifiers to `usize` positions once and then work on
//! plain vectors. Position `i` is the `i`-th vertex in insertion order.

use std::collections::{BTreeSet, HashMap};

use super::{Graph, VertexId};

/// Weighted adjacency entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Index of the adjacent vertex.
    pub index: usize,
    /// Weight of the connecting edge.
    pub weight: f64,
}

/// Read-only snapshot with contiguous vertex indices.
///
/// For undirected graphs every edge appears in the lists of both endpoints
/// (a self-loop appears once). For directed graphs `outgoing` holds successors
/// and `incoming` predecessors.
#[derive(Clone, Debug)]
pub struct IndexedGraph {
    ids: Vec<VertexId>,
    positions: HashMap<VertexId, usize>,
    directed: bool,
    edge_count: usize,
    outgoing: Vec<Vec<Neighbor>>,
    incoming: Vec<Vec<Neighbor>>,
    edges: Vec<(usize, usize, f64)>,
}

impl IndexedGraph {
    pub(super) fn new(graph: &Graph) -> Self {
        let ids: Vec<VertexId> = graph.vertices().cloned().collect();
        let edges = graph
            .edges()
            .filter_map(|edge| {
                Some((
                    graph.vertex_index(edge.source())?,
                    graph.vertex_index(edge.target())?,
                    edge.weight(),
                ))
            })
            .collect();
        Self::from_edges(ids, graph.is_directed(), edges)
    }

    /// Builds a snapshot from positional edges. Endpoints outside `ids` are
    /// skipped.
    pub(crate) fn from_edges(
        ids: Vec<VertexId>,
        directed: bool,
        edges: Vec<(usize, usize, f64)>,
    ) -> Self {
        let n = ids.len();
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); if directed { n } else { 0 }];
        let edges: Vec<(usize, usize, f64)> = edges
            .into_iter()
            .filter(|&(s, t, _)| s < n && t < n)
            .collect();
        for &(s, t, weight) in &edges {
            outgoing[s].push(Neighbor { index: t, weight });
            if directed {
                incoming[t].push(Neighbor { index: s, weight });
            } else if s != t {
                outgoing[t].push(Neighbor { index: s, weight });
            }
        }
        let positions = ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
        Self {
            ids,
            positions,
            directed,
            edge_count: edges.len(),
            outgoing,
            incoming,
            edges,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` when the snapshot has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` for directed graphs.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Number of edges.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge_count(&self) -> usize { self.edge_count }

    /// Identifier of vertex `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn id(&self, index: usize) -> &VertexId {
        &self.ids[index]
    }

    /// All identifiers in index order.
    #[must_use]
    pub fn ids(&self) -> &[VertexId] {
        &self.ids
    }

    /// Position of `id`, if present.
    #[must_use]
    pub fn index_of(&self, id: &VertexId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Successors (directed) or neighbours (undirected) of `index`.
    #[must_use]
    pub fn outgoing(&self, index: usize) -> &[Neighbor] {
        self.outgoing.get(index).map_or(&[], Vec::as_slice)
    }

    /// Predecessors (directed) or neighbours (undirected) of `index`.
    #[must_use]
    pub fn incoming(&self, index: usize) -> &[Neighbor] {
        let lists = if self.directed { &self.incoming } else { &self.outgoing };
        lists.get(index).map_or(&[], Vec::as_slice)
    }

    /// Edges as `(source, target, weight)` in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize, f64)] {
        &self.edges
    }

    /// Simple undirected view: sorted, deduplicated neighbour indices with
    /// self-loops dropped and edge directions ignored.
    #[must_use]
    pub fn simple_adjacency(&self) -> Vec<Vec<usize>> {
        let mut sets = vec![BTreeSet::new(); self.len()];
        for &(s, t, _) in &self.edges {
            if s == t {
                continue;
            }
            if let Some(set) = sets.get_mut(s) {
                set.insert(t);
            }
            if let Some(set) = sets.get_mut(t) {
                set.insert(s);
            }
        }
        sets.into_iter().map(|set| set.into_iter().collect()).collect()
    }

    /// Symmetric weighted adjacency matrix. Directed edges contribute to both
    /// `a[s][t]` and `a[t][s]`; antiparallel pairs sum.
    #[must_use]
    pub fn symmetric_weights(&self) -> Vec<Vec<f64>> {
        let n = self.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for &(s, t, weight) in &self.edges {
            if let Some(row) = matrix.get_mut(s) {
                if let Some(cell) = row.get_mut(t) {
                    *cell += weight;
                }
            }
            if s != t {
                if let Some(row) = matrix.get_mut(t) {
                    if let Some(cell) = row.get_mut(s) {
                        *cell += weight;
                    }
                }
            }
        }
        matrix
    }

    /// Position of each vertex when all vertices are sorted by id.
    #[must_use]
    pub fn id_ranks(&self) -> Vec<usize> {
        let mut by_id: Vec<usize> = (0..self.len()).collect();
        by_id.sort_by(|&a, &b| self.ids[a].cmp(&self.ids[b]));
        let mut rank = vec![0; self.len()];
        for (position, vertex) in by_id.into_iter().enumerate() {
            rank[vertex] = position;
        }
        rank
    }

    /// Returns the first vertex carrying a self-loop.
    #[must_use]
    pub fn first_self_loop(&self) -> Option<usize> {
        self.edges
            .iter()
            .find(|(s, t, _)| s == t)
            .map(|&(s, _, _)| s)
    }
}
