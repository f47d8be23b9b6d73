//! Vertex and edge centrality measures.
//!
//! Every measure is a pure function from a [`Graph`] to a score per vertex.
//! Path-based measures (betweenness, closeness, harmonic) use hop counts on
//! unit-weight graphs and Dijkstra distances otherwise. The spectral measures
//! (eigenvector, PageRank, Katz) iterate through the shared fixed-point helper
//! and fail with [`AlgorithmError::ConvergenceFailure`] when the iteration cap
//! is exhausted.

mod paths_based;
mod spectral;

use indexmap::IndexMap;
use serde::Serialize;

pub use self::{
    paths_based::{
        EdgeScore, betweenness_centrality, closeness_centrality, edge_betweenness_centrality,
        harmonic_centrality,
    },
    spectral::{
        KatzConfig, PageRankConfig, eigenvector_centrality, katz_centrality, pagerank,
    },
};
use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

/// Score per vertex, in the graph's natural vertex order.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, centrality::degree_centrality};
///
/// let mut graph = Graph::undirected("star");
/// for id in 0..4 {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// for leaf in 1..4 {
///     graph.add_edge(0, leaf, 1.0, Attributes::new())?;
/// }
/// let scores = degree_centrality(&graph);
/// assert_eq!(scores.get(&0.into()), Some(1.0));
/// assert_eq!(scores.top_k(1)[0].0, 0.into());
/// # Ok::<(), grafo_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CentralityScores(IndexMap<VertexId, f64>);

impl CentralityScores {
    pub(crate) fn from_indexed(graph: &IndexedGraph, values: Vec<f64>) -> Self {
        Self(graph.ids().iter().cloned().zip(values).collect())
    }

    /// Score of one vertex.
    #[must_use]
    pub fn get(&self, id: &VertexId) -> Option<f64> {
        self.0.get(id).copied()
    }

    /// Iterates `(vertex, score)` in natural order.
    pub fn iter(&self) -> impl Iterator<Item = (&VertexId, f64)> + '_ {
        self.0.iter().map(|(id, score)| (id, *score))
    }

    /// Number of scored vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no vertex was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all scores.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// The `k` highest-scoring vertices, ties broken by ascending id.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(VertexId, f64)> {
        let mut ranked: Vec<(VertexId, f64)> =
            self.0.iter().map(|(id, score)| (id.clone(), *score)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    /// Unwraps the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<VertexId, f64> {
        self.0
    }
}

/// Raw degree of every vertex as a float, see [`Graph::degree`].
///
/// For undirected graphs the scores sum to twice the edge count.
#[must_use]
pub fn degree_counts(graph: &Graph) -> CentralityScores {
    let indexed = graph.indexed();
    CentralityScores::from_indexed(&indexed, raw_degrees(&indexed))
}

/// Degree centrality: degree divided by `n - 1`.
///
/// Directed graphs use total (in + out) degree. Graphs with fewer than two
/// vertices score 0 everywhere.
#[tracing::instrument(
    name = "centrality.degree",
    level = "debug",
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
#[must_use]
pub fn degree_centrality(graph: &Graph) -> CentralityScores {
    let indexed = graph.indexed();
    let mut values = raw_degrees(&indexed);
    let scale = denominator(indexed.len());
    for value in &mut values {
        *value = scale.map_or(0.0, |d| *value / d);
    }
    CentralityScores::from_indexed(&indexed, values)
}

#[expect(clippy::cast_precision_loss, reason = "degrees stay far below 2^52")]
fn raw_degrees(graph: &IndexedGraph) -> Vec<f64> {
    let mut degrees = vec![0_usize; graph.len()];
    for &(s, t, _) in graph.edges() {
        degrees[s] += 1;
        degrees[t] += 1;
    }
    degrees.into_iter().map(|d| d as f64).collect()
}

#[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
fn denominator(n: usize) -> Option<f64> {
    (n > 1).then(|| (n - 1) as f64)
}

pub(crate) fn require_vertices(graph: &Graph, algorithm: &'static str) -> Result<()> {
    if graph.is_empty() {
        Err(AlgorithmError::EmptyGraph { algorithm })
    } else {
        Ok(())
    }
}

pub(crate) fn l2_normalize(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in values {
            *value /= norm;
        }
    }
}
