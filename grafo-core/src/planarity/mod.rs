//! Planarity testing, planar embeddings, Kuratowski witnesses and genus
//! bounds.
//!
//! Everything here runs on the underlying simple undirected graph: edge
//! directions are ignored, antiparallel pairs merge and self-loops are
//! dropped since none of them affect planarity.

mod lr;

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, instrument};

use self::lr::{Rotation, adjacency_of, is_planar_edges, planar_rotation};
use crate::{
    graph::{Graph, IndexedGraph, VertexId},
    union_find::DisjointSet,
};

/// Combinatorial planar embedding: the clockwise order of neighbours around
/// every vertex, plus the faces it induces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlanarEmbedding {
    rotation: IndexMap<VertexId, Vec<VertexId>>,
    faces: Vec<Vec<VertexId>>,
}

impl PlanarEmbedding {
    fn new(indexed: &IndexedGraph, rotation: &Rotation) -> Self {
        let faces = trace_faces(rotation)
            .into_iter()
            .map(|face| face.into_iter().map(|v| indexed.id(v).clone()).collect())
            .collect();
        let rotation = (0..rotation.len())
            .map(|v| {
                let around = rotation
                    .clockwise(v)
                    .into_iter()
                    .map(|w| indexed.id(w).clone())
                    .collect();
                (indexed.id(v).clone(), around)
            })
            .collect();
        Self { rotation, faces }
    }

    /// Clockwise neighbour order around `vertex`.
    #[must_use]
    pub fn rotation(&self, vertex: &VertexId) -> Option<&[VertexId]> {
        self.rotation.get(vertex).map(Vec::as_slice)
    }

    /// Clockwise neighbour order around every vertex, in natural order.
    #[must_use]
    pub const fn rotations(&self) -> &IndexMap<VertexId, Vec<VertexId>> {
        &self.rotation
    }

    /// Faces as closed vertex walks. A bridge appears twice on the face that
    /// surrounds it.
    #[must_use]
    pub fn faces(&self) -> &[Vec<VertexId>] {
        &self.faces
    }

    /// Number of faces traced from the rotation system.
    ///
    /// For a connected graph this equals `E - V + 2` by Euler's formula.
    /// Every component with at least one edge contributes its own outer
    /// face; isolated vertices contribute none.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Orbits of half-edges under `(v, w) -> (w, ccw_w(v))`.
fn trace_faces(rotation: &Rotation) -> Vec<Vec<usize>> {
    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    let mut faces = Vec::new();
    for v in 0..rotation.len() {
        for w in rotation.clockwise(v) {
            if visited.contains(&(v, w)) {
                continue;
            }
            let mut face = Vec::new();
            let (mut a, mut b) = (v, w);
            while visited.insert((a, b)) {
                face.push(a);
                let Some(next) = rotation.counter_clockwise(b, a) else {
                    break;
                };
                (a, b) = (b, next);
            }
            faces.push(face);
        }
    }
    faces
}

/// Kuratowski graph a non-planarity witness subdivides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum KuratowskiKind {
    /// Complete graph on five vertices.
    #[serde(rename = "k5")]
    K5,
    /// Complete bipartite graph on three plus three vertices.
    #[serde(rename = "k3_3")]
    K33,
}

/// Subdivision of K5 or K3,3 contained in a non-planar graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KuratowskiWitness {
    /// Which Kuratowski graph is subdivided.
    pub kind: KuratowskiKind,
    /// Vertices of degree at least three in the witness, in natural order.
    pub branch_vertices: Vec<VertexId>,
    /// Witness edges; degree-two vertices on them are subdivision points.
    pub edges: Vec<(VertexId, VertexId)>,
}

/// Outcome of a planarity check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Planarity {
    /// The graph is planar; an embedding is attached.
    Planar(PlanarEmbedding),
    /// The graph is not planar; a Kuratowski witness is attached.
    NonPlanar(KuratowskiWitness),
}

impl Planarity {
    /// Returns `true` for [`Planarity::Planar`].
    #[must_use]
    pub const fn is_planar(&self) -> bool {
        matches!(self, Self::Planar(_))
    }
}

/// Simple undirected edges `(a, b)` with `a < b`.
fn simple_edges(indexed: &IndexedGraph) -> Vec<(usize, usize)> {
    indexed
        .simple_adjacency()
        .into_iter()
        .enumerate()
        .flat_map(|(a, neighbours)| {
            neighbours
                .into_iter()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
        .collect()
}

/// Shrinks `edges` to an edge-minimal non-planar subgraph: an edge stays only
/// when deleting it would make the rest planar.
fn minimal_non_planar(n: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut kept = edges.to_vec();
    let mut index = 0;
    while index < kept.len() {
        let removed = kept.remove(index);
        if is_planar_edges(n, &kept) {
            kept.insert(index, removed);
            index += 1;
        }
    }
    kept
}

fn witness(indexed: &IndexedGraph, edges: &[(usize, usize)]) -> KuratowskiWitness {
    let kept = minimal_non_planar(indexed.len(), edges);
    let mut degree = vec![0_usize; indexed.len()];
    for &(a, b) in &kept {
        degree[a] += 1;
        degree[b] += 1;
    }
    let branch: Vec<usize> = (0..indexed.len()).filter(|&v| degree[v] >= 3).collect();
    let kind = if branch.len() == 5 {
        KuratowskiKind::K5
    } else {
        KuratowskiKind::K33
    };
    debug!(?kind, edges = kept.len(), "kuratowski witness extracted");
    KuratowskiWitness {
        kind,
        branch_vertices: branch.into_iter().map(|v| indexed.id(v).clone()).collect(),
        edges: kept
            .into_iter()
            .map(|(a, b)| (indexed.id(a).clone(), indexed.id(b).clone()))
            .collect(),
    }
}

/// Tests planarity and returns either an embedding or a Kuratowski witness.
///
/// The test is the linear-time left-right algorithm, with an immediate
/// rejection when `E > 3V - 6`. Witness extraction deletes edges one at a
/// time while the remainder stays non-planar, which costs one planarity test
/// per edge.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, planarity::{KuratowskiKind, Planarity, check_planarity}};
///
/// let mut k5 = Graph::undirected("k5");
/// for id in 0..5 {
///     k5.add_vertex(id, Attributes::new())?;
/// }
/// for a in 0..5 {
///     for b in (a + 1)..5 {
///         k5.add_edge(a, b, 1.0, Attributes::new())?;
///     }
/// }
/// match check_planarity(&k5) {
///     Planarity::NonPlanar(witness) => {
///         assert_eq!(witness.kind, KuratowskiKind::K5);
///         assert_eq!(witness.edges.len(), 10);
///     }
///     Planarity::Planar(_) => unreachable!("K5 is not planar"),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "planarity.check",
    level = "debug",
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn check_planarity(graph: &Graph) -> Planarity {
    let indexed = graph.indexed();
    let edges = simple_edges(&indexed);
    match planar_rotation(&adjacency_of(indexed.len(), &edges)) {
        Some(rotation) => Planarity::Planar(PlanarEmbedding::new(&indexed, &rotation)),
        None => Planarity::NonPlanar(witness(&indexed, &edges)),
    }
}

/// Returns `true` when the graph is planar.
#[must_use]
pub fn is_planar(graph: &Graph) -> bool {
    let indexed = graph.indexed();
    is_planar_edges(indexed.len(), &simple_edges(&indexed))
}

/// Planar embedding of the graph, or `None` when it is not planar.
#[must_use]
pub fn planar_embedding(graph: &Graph) -> Option<PlanarEmbedding> {
    let indexed = graph.indexed();
    let edges = simple_edges(&indexed);
    planar_rotation(&adjacency_of(indexed.len(), &edges))
        .map(|rotation| PlanarEmbedding::new(&indexed, &rotation))
}

/// Kuratowski witness of non-planarity, or `None` when the graph is planar.
#[must_use]
pub fn kuratowski_subgraph(graph: &Graph) -> Option<KuratowskiWitness> {
    match check_planarity(graph) {
        Planarity::Planar(_) => None,
        Planarity::NonPlanar(witness) => Some(witness),
    }
}

/// Bounds on the orientable genus.
///
/// Both bounds are zero for planar graphs. Otherwise they are estimates: the
/// exact genus is NP-hard to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GenusEstimate {
    /// Euler bound: the sum over components of `ceil((E - 3V + 6) / 6)`,
    /// floored at zero.
    pub lower: usize,
    /// Edges left over by a greedy maximal planar subgraph; each can be
    /// routed over its own handle.
    pub upper: usize,
}

impl GenusEstimate {
    /// Returns `true` when the bounds coincide.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.lower == self.upper
    }
}

fn euler_lower_bound(n: usize, edges: &[(usize, usize)]) -> usize {
    let mut components = DisjointSet::new(n);
    for &(a, b) in edges {
        components.union(a, b);
    }
    let mut sizes = vec![(0_usize, 0_usize); n];
    for v in 0..n {
        sizes[components.find(v)].0 += 1;
    }
    for &(a, _) in edges {
        sizes[components.find(a)].1 += 1;
    }
    sizes
        .into_iter()
        .filter(|&(vertices, _)| vertices >= 3)
        .map(|(vertices, edges)| (edges + 6).saturating_sub(3 * vertices).div_ceil(6))
        .sum()
}

/// Lower and upper bounds on the genus.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, planarity::genus_estimate};
///
/// let mut k33 = Graph::undirected("k33");
/// for id in 0..6 {
///     k33.add_vertex(id, Attributes::new())?;
/// }
/// for a in 0..3 {
///     for b in 3..6 {
///         k33.add_edge(a, b, 1.0, Attributes::new())?;
///     }
/// }
/// let genus = genus_estimate(&k33);
/// assert_eq!((genus.lower, genus.upper), (1, 1));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "planarity.genus",
    level = "debug",
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
#[must_use]
pub fn genus_estimate(graph: &Graph) -> GenusEstimate {
    let indexed = graph.indexed();
    let n = indexed.len();
    let edges = simple_edges(&indexed);
    if is_planar_edges(n, &edges) {
        return GenusEstimate { lower: 0, upper: 0 };
    }
    let lower = euler_lower_bound(n, &edges);
    let mut planar = Vec::with_capacity(edges.len());
    let mut leftover = 0_usize;
    for &edge in &edges {
        planar.push(edge);
        if !is_planar_edges(n, &planar) {
            planar.pop();
            leftover += 1;
        }
    }
    let lower = lower.max(1);
    debug!(lower, leftover, "genus bounds");
    GenusEstimate {
        lower,
        upper: leftover.max(lower),
    }
}
