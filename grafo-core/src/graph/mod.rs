//! Canonical in-memory graph model.
//!
//! A [`Graph`] owns its vertices and edges and maintains an adjacency index
//! alongside them. Every mutation updates the index before returning, so
//! lookups never observe a stale view. Algorithms only borrow the graph and
//! read it through [`IndexedGraph`] snapshots.
//!
//! Policies:
//! - inserting an existing vertex fails with [`GraphError::DuplicateVertex`];
//! - an edge naming a missing endpoint fails with
//!   [`GraphError::VertexNotFound`]; vertices are never created implicitly;
//! - a second edge between the same endpoints fails with
//!   [`GraphError::InvalidEdge`];
//! - self-loops are accepted and count twice towards an undirected degree.

mod attributes;
mod id;
mod indexed;

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet, map::Entry};
use serde::Serialize;
use tracing::instrument;

pub use self::{
    attributes::{AttributeValue, Attributes, WEIGHT_KEY},
    id::VertexId,
    indexed::{IndexedGraph, Neighbor},
};
use crate::{
    error::{GraphError, GraphResult},
    union_find::DisjointSet,
};

/// A weighted edge together with its attributes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edge {
    source: VertexId,
    target: VertexId,
    weight: f64,
    attributes: Attributes,
}

impl Edge {
    /// Returns the source endpoint as inserted.
    #[must_use]
    pub const fn source(&self) -> &VertexId {
        &self.source
    }

    /// Returns the target endpoint as inserted.
    #[must_use]
    pub const fn target(&self) -> &VertexId {
        &self.target
    }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f64 { self.weight }

    /// Returns the edge attributes. The weight is never part of them.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns `true` when both endpoints coincide.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

type EdgeKey = (VertexId, VertexId);
type Adjacency = IndexMap<VertexId, IndexSet<VertexId>>;

/// Ordered neighbour iterator returned by [`Graph::neighbors`].
pub type Neighbors<'a> = indexmap::set::Iter<'a, VertexId>;

/// Vertex/edge store with a maintained adjacency index.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph};
///
/// let mut graph = Graph::undirected("triangle");
/// for id in ["a", "b", "c"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge("a", "b", 1.0, Attributes::new())?;
/// graph.add_edge("b", "c", 2.0, Attributes::new())?;
/// graph.add_edge("c", "a", 3.0, Attributes::new())?;
///
/// assert_eq!(graph.degree(&"a".into())?, 2);
/// assert!(graph.has_edge(&"a".into(), &"c".into()));
/// # Ok::<(), grafo_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    name: String,
    directed: bool,
    weighted: bool,
    vertices: IndexMap<VertexId, Attributes>,
    edges: IndexMap<EdgeKey, Edge>,
    /// Successors (directed) or neighbours (undirected).
    adjacency: Adjacency,
    /// Predecessors; only maintained for directed graphs.
    reverse: Adjacency,
}

impl Graph {
    /// Creates an empty undirected, weighted graph.
    #[must_use]
    pub fn undirected(name: impl Into<String>) -> Self {
        Self::with_kind(name, false)
    }

    /// Creates an empty directed, weighted graph.
    #[must_use]
    pub fn directed(name: impl Into<String>) -> Self {
        Self::with_kind(name, true)
    }

    fn with_kind(name: impl Into<String>, directed: bool) -> Self {
        Self {
            name: name.into(),
            directed,
            weighted: true,
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            adjacency: IndexMap::new(),
            reverse: IndexMap::new(),
        }
    }

    /// Marks the graph as unweighted: every edge must then carry weight 1.0.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidEdge`] if an existing edge has another weight.
    pub fn into_unweighted(mut self) -> GraphResult<Self> {
        if let Some(edge) = self.edges.values().find(|edge| edge.weight != 1.0) {
            return Err(GraphError::InvalidEdge {
                from: edge.source.clone(),
                to: edge.target.clone(),
                reason: Arc::from("unweighted graphs only accept weight 1.0"),
            });
        }
        self.weighted = false;
        Ok(self)
    }

    /// Returns the graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for directed graphs.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Returns `true` for weighted graphs.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_weighted(&self) -> bool { self.weighted }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates vertex identifiers in insertion order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &VertexId> + '_ {
        self.vertices.keys()
    }

    /// Iterates edges in insertion order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    /// Returns `true` if the vertex exists.
    #[must_use]
    pub fn contains_vertex(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    /// Returns the attributes of a vertex.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex is absent.
    pub fn vertex_attributes(&self, id: &VertexId) -> GraphResult<&Attributes> {
        self.vertices
            .get(id)
            .ok_or_else(|| GraphError::VertexNotFound { vertex: id.clone() })
    }

    /// Inserts a vertex.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateVertex`] if the identifier is taken and
    /// [`GraphError::ReservedAttribute`] if `attributes` contains
    /// [`WEIGHT_KEY`].
    pub fn add_vertex(&mut self, id: impl Into<VertexId>, attributes: Attributes) -> GraphResult<()> {
        let id = id.into();
        reject_reserved(&attributes)?;
        match self.vertices.entry(id) {
            Entry::Occupied(entry) => Err(GraphError::DuplicateVertex {
                vertex: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let id = entry.key().clone();
                entry.insert(attributes);
                self.adjacency.insert(id.clone(), IndexSet::new());
                if self.directed {
                    self.reverse.insert(id, IndexSet::new());
                }
                Ok(())
            }
        }
    }

    /// Inserts an edge between two existing vertices.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] for a missing endpoint,
    /// [`GraphError::InvalidEdge`] for a duplicate edge, a non-finite weight or
    /// a weight other than 1.0 on an unweighted graph, and
    /// [`GraphError::ReservedAttribute`] if `attributes` contains
    /// [`WEIGHT_KEY`].
    #[instrument(
        name = "graph.add_edge",
        level = "trace",
        err,
        skip(self, source, target, attributes),
        fields(graph = %self.name)
    )]
    pub fn add_edge(
        &mut self,
        source: impl Into<VertexId>,
        target: impl Into<VertexId>,
        weight: f64,
        attributes: Attributes,
    ) -> GraphResult<()> {
        let source = source.into();
        let target = target.into();
        self.require_vertex(&source)?;
        self.require_vertex(&target)?;
        reject_reserved(&attributes)?;
        let invalid = |reason: &str| GraphError::InvalidEdge {
            from: source.clone(),
            to: target.clone(),
            reason: Arc::from(reason),
        };
        if !weight.is_finite() {
            return Err(invalid("weight must be finite"));
        }
        if !self.weighted && weight != 1.0 {
            return Err(invalid("unweighted graphs only accept weight 1.0"));
        }
        if self.has_edge(&source, &target) {
            return Err(invalid("edge already exists"));
        }

        self.link(&source, &target);
        self.edges.insert(
            (source.clone(), target.clone()),
            Edge {
                source,
                target,
                weight,
                attributes,
            },
        );
        Ok(())
    }

    /// Removes a vertex and every incident edge.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex is absent.
    pub fn remove_vertex(&mut self, id: &VertexId) -> GraphResult<Attributes> {
        self.require_vertex(id)?;
        let mut incident: Vec<EdgeKey> = Vec::new();
        if let Some(successors) = self.adjacency.get(id) {
            incident.extend(successors.iter().map(|other| (id.clone(), other.clone())));
        }
        if let Some(predecessors) = self.reverse.get(id) {
            incident.extend(
                predecessors
                    .iter()
                    .filter(|other| *other != id)
                    .map(|other| (other.clone(), id.clone())),
            );
        }
        for (a, b) in incident {
            // Undirected edges may be stored in either orientation.
            if self.has_edge(&a, &b) {
                self.remove_edge(&a, &b)?;
            }
        }
        self.adjacency.shift_remove(id);
        self.reverse.shift_remove(id);
        self.vertices
            .shift_remove(id)
            .ok_or_else(|| GraphError::VertexNotFound { vertex: id.clone() })
    }

    /// Removes an edge and returns it.
    ///
    /// Undirected graphs accept either endpoint order.
    ///
    /// # Errors
    /// Returns [`GraphError::EdgeNotFound`] if no such edge exists.
    pub fn remove_edge(&mut self, source: &VertexId, target: &VertexId) -> GraphResult<Edge> {
        let key = self
            .stored_key(source, target)
            .ok_or_else(|| GraphError::EdgeNotFound {
                from: source.clone(),
                to: target.clone(),
            })?;
        let edge = self
            .edges
            .shift_remove(&key)
            .ok_or_else(|| GraphError::EdgeNotFound {
                from: source.clone(),
                to: target.clone(),
            })?;
        self.unlink(&edge.source, &edge.target);
        Ok(edge)
    }

    /// Returns neighbours in insertion order: successors for directed graphs,
    /// all adjacent vertices for undirected graphs.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex is absent.
    pub fn neighbors(&self, id: &VertexId) -> GraphResult<Neighbors<'_>> {
        self.adjacency
            .get(id)
            .map(IndexSet::iter)
            .ok_or_else(|| GraphError::VertexNotFound { vertex: id.clone() })
    }

    /// Alias of [`Self::neighbors`] that reads better on directed graphs.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex is absent.
    pub fn successors(&self, id: &VertexId) -> GraphResult<Neighbors<'_>> {
        self.neighbors(id)
    }

    /// Returns predecessors in insertion order. Equals [`Self::neighbors`] for
    /// undirected graphs.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex is absent.
    pub fn predecessors(&self, id: &VertexId) -> GraphResult<Neighbors<'_>> {
        let index = if self.directed { &self.reverse } else { &self.adjacency };
        index
            .get(id)
            .map(IndexSet::iter)
            .ok_or_else(|| GraphError::VertexNotFound { vertex: id.clone() })
    }

    /// Returns the degree of a vertex: total degree (in + out) for directed
    /// graphs, incident edge count for undirected graphs with self-loops
    /// counted twice.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex is absent.
    pub fn degree(&self, id: &VertexId) -> GraphResult<usize> {
        if self.directed {
            return Ok(self.out_degree(id)? + self.in_degree(id)?);
        }
        let neighbours = self.adjacency_of(id)?;
        let loops = usize::from(neighbours.contains(id));
        Ok(neighbours.len() + loops)
    }

    /// Returns the number of outgoing edges (the degree for undirected graphs).
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex is absent.
    pub fn out_degree(&self, id: &VertexId) -> GraphResult<usize> {
        if self.directed {
            Ok(self.adjacency_of(id)?.len())
        } else {
            self.degree(id)
        }
    }

    /// Returns the number of incoming edges (the degree for undirected graphs).
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex is absent.
    pub fn in_degree(&self, id: &VertexId) -> GraphResult<usize> {
        if self.directed {
            self.reverse
                .get(id)
                .map(IndexSet::len)
                .ok_or_else(|| GraphError::VertexNotFound { vertex: id.clone() })
        } else {
            self.degree(id)
        }
    }

    /// Returns `true` when the edge exists. Undirected graphs ignore endpoint
    /// order.
    #[must_use]
    pub fn has_edge(&self, source: &VertexId, target: &VertexId) -> bool {
        self.adjacency
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Looks up an edge. Undirected graphs ignore endpoint order.
    #[must_use]
    pub fn edge(&self, source: &VertexId, target: &VertexId) -> Option<&Edge> {
        self.stored_key(source, target)
            .and_then(|key| self.edges.get(&key))
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges.values().map(|edge| edge.weight).sum()
    }

    /// Edge density: |E| / max possible edges, ignoring self-loops.
    #[expect(
        clippy::cast_precision_loss,
        reason = "vertex counts stay far below 2^52"
    )]
    #[must_use]
    pub fn density(&self) -> f64 {
        let n = self.vertices.len() as f64;
        if n < 2.0 {
            return 0.0;
        }
        let pairs = if self.directed { n * (n - 1.0) } else { n * (n - 1.0) / 2.0 };
        self.edges.len() as f64 / pairs
    }

    /// Partitions vertices into connected components (weakly connected for
    /// directed graphs).
    ///
    /// Components are ordered by their first vertex in insertion order and list
    /// vertices in insertion order.
    ///
    /// # Examples
    /// ```
    /// use grafo_core::{Attributes, Graph, VertexId};
    ///
    /// let mut graph = Graph::undirected("two");
    /// for id in 0..4 {
    ///     graph.add_vertex(id, Attributes::new())?;
    /// }
    /// graph.add_edge(0, 1, 1.0, Attributes::new())?;
    /// graph.add_edge(2, 3, 1.0, Attributes::new())?;
    /// let components = graph.connected_components();
    /// assert_eq!(components, vec![
    ///     vec![VertexId::from(0), VertexId::from(1)],
    ///     vec![VertexId::from(2), VertexId::from(3)],
    /// ]);
    /// # Ok::<(), grafo_core::GraphError>(())
    /// ```
    #[must_use]
    pub fn connected_components(&self) -> Vec<Vec<VertexId>> {
        let mut forest = DisjointSet::new(self.vertices.len());
        for edge in self.edges.values() {
            if let (Some(a), Some(b)) = (
                self.vertices.get_index_of(&edge.source),
                self.vertices.get_index_of(&edge.target),
            ) {
                forest.union(a, b);
            }
        }
        let mut by_root: IndexMap<usize, Vec<VertexId>> = IndexMap::new();
        for (index, id) in self.vertices.keys().enumerate() {
            by_root
                .entry(forest.find(index))
                .or_default()
                .push(id.clone());
        }
        by_root.into_values().collect()
    }

    /// Builds a dense snapshot with contiguous vertex indices.
    #[must_use]
    pub fn indexed(&self) -> IndexedGraph {
        IndexedGraph::new(self)
    }

    pub(crate) fn vertex_index(&self, id: &VertexId) -> Option<usize> {
        self.vertices.get_index_of(id)
    }

    fn require_vertex(&self, id: &VertexId) -> GraphResult<()> {
        if self.vertices.contains_key(id) {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound { vertex: id.clone() })
        }
    }

    fn adjacency_of(&self, id: &VertexId) -> GraphResult<&IndexSet<VertexId>> {
        self.adjacency
            .get(id)
            .ok_or_else(|| GraphError::VertexNotFound { vertex: id.clone() })
    }

    fn stored_key(&self, source: &VertexId, target: &VertexId) -> Option<EdgeKey> {
        let forward = (source.clone(), target.clone());
        if self.edges.contains_key(&forward) {
            return Some(forward);
        }
        if self.directed {
            return None;
        }
        let backward = (target.clone(), source.clone());
        self.edges.contains_key(&backward).then_some(backward)
    }

    fn link(&mut self, source: &VertexId, target: &VertexId) {
        if let Some(targets) = self.adjacency.get_mut(source) {
            targets.insert(target.clone());
        }
        let mirror = if self.directed { &mut self.reverse } else { &mut self.adjacency };
        if let Some(sources) = mirror.get_mut(target) {
            sources.insert(source.clone());
        }
    }

    fn unlink(&mut self, source: &VertexId, target: &VertexId) {
        if let Some(targets) = self.adjacency.get_mut(source) {
            targets.shift_remove(target);
        }
        let mirror = if self.directed { &mut self.reverse } else { &mut self.adjacency };
        if let Some(sources) = mirror.get_mut(target) {
            sources.shift_remove(source);
        }
    }
}

fn reject_reserved(attributes: &Attributes) -> GraphResult<()> {
    if attributes.contains_key(WEIGHT_KEY) {
        Err(GraphError::ReservedAttribute {
            key: Arc::from(WEIGHT_KEY),
        })
    } else {
        Ok(())
    }
}
