//! Shortest-path based measures: betweenness, closeness and harmonic.

use serde::Serialize;
use tracing::instrument;

use super::CentralityScores;
use crate::{
    error::Result,
    graph::{Graph, VertexId},
    paths::{Direction, PathMetric, raw_edge_betweenness, single_source, sum_over_sources},
};

/// Score attached to one edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeScore {
    /// Edge source as stored.
    pub source: VertexId,
    /// Edge target as stored.
    pub target: VertexId,
    /// Score of the edge.
    pub score: f64,
}

/// Brandes betweenness centrality.
///
/// With `normalized` the scores are divided by the number of vertex pairs not
/// involving the vertex: `(n-1)(n-2)` ordered pairs for directed graphs and
/// half that for undirected graphs.
///
/// # Errors
/// Returns [`crate::AlgorithmError::NegativeWeight`] if a weight is negative.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, centrality::betweenness_centrality};
///
/// let mut graph = Graph::undirected("path");
/// for id in ["a", "b", "c"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge("a", "b", 1.0, Attributes::new())?;
/// graph.add_edge("b", "c", 1.0, Attributes::new())?;
/// let scores = betweenness_centrality(&graph, false)?;
/// assert_eq!(scores.get(&"b".into()), Some(1.0));
/// assert_eq!(scores.get(&"a".into()), Some(0.0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "centrality.betweenness",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
pub fn betweenness_centrality(graph: &Graph, normalized: bool) -> Result<CentralityScores> {
    let indexed = graph.indexed();
    let metric = PathMetric::for_graph(&indexed, "betweenness")?;
    let n = indexed.len();
    let per_source = |source: usize| {
        let dag = single_source(&indexed, source, metric, Direction::Forward);
        let mut delta = vec![0.0; n];
        let mut scores = vec![0.0; n];
        for &w in dag.order.iter().rev() {
            let coefficient = (1.0 + delta[w]) / dag.sigma[w];
            for &v in &dag.predecessors[w] {
                delta[v] += dag.sigma[v] * coefficient;
            }
            if w != source {
                scores[w] += delta[w];
            }
        }
        scores
    };
    let mut values = sum_over_sources(n, n, per_source);
    if let Some(scale) = vertex_scale(n, normalized, indexed.is_directed()) {
        for value in &mut values {
            *value *= scale;
        }
    }
    Ok(CentralityScores::from_indexed(&indexed, values))
}

/// Undirected traversals count every pair from both ends; normalization
/// divides by the ordered pair count, which absorbs that doubling.
#[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
fn vertex_scale(n: usize, normalized: bool, directed: bool) -> Option<f64> {
    if normalized {
        (n > 2).then(|| 1.0 / ((n - 1) * (n - 2)) as f64)
    } else {
        (!directed).then_some(0.5)
    }
}

/// Brandes edge betweenness, in edge insertion order.
///
/// With `normalized` the scores are divided by `n(n-1)` (directed) or
/// `n(n-1)/2` (undirected).
///
/// # Errors
/// Returns [`crate::AlgorithmError::NegativeWeight`] if a weight is negative.
#[instrument(
    name = "centrality.edge_betweenness",
    level = "debug",
    err,
    skip(graph),
    fields(edges = graph.edge_count())
)]
pub fn edge_betweenness_centrality(graph: &Graph, normalized: bool) -> Result<Vec<EdgeScore>> {
    let indexed = graph.indexed();
    let metric = PathMetric::for_graph(&indexed, "edge_betweenness")?;
    let raw = raw_edge_betweenness(&indexed, metric);
    let scale = edge_scale(indexed.len(), normalized, indexed.is_directed());
    Ok(graph
        .edges()
        .zip(raw)
        .map(|(edge, score)| EdgeScore {
            source: edge.source().clone(),
            target: edge.target().clone(),
            score: scale.map_or(score, |factor| score * factor),
        })
        .collect())
}

#[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
fn edge_scale(n: usize, normalized: bool, directed: bool) -> Option<f64> {
    if normalized {
        (n > 1).then(|| 1.0 / (n * (n - 1)) as f64)
    } else {
        (!directed).then_some(0.5)
    }
}

/// Closeness centrality: `(r - 1) / sum(d)` over the `r` vertices that can
/// reach the vertex (itself included).
///
/// Unreachable vertices are excluded and isolated vertices score 0. Directed
/// graphs measure incoming distance.
///
/// # Errors
/// Returns [`crate::AlgorithmError::NegativeWeight`] if a weight is negative.
#[instrument(
    name = "centrality.closeness",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
pub fn closeness_centrality(graph: &Graph) -> Result<CentralityScores> {
    distance_measure(graph, "closeness", |distances| {
        let reachable: Vec<f64> = distances.iter().copied().filter(|d| d.is_finite()).collect();
        let total: f64 = reachable.iter().sum();
        if total > 0.0 {
            count_as_f64(reachable.len() - 1) / total
        } else {
            0.0
        }
    })
}

/// Harmonic centrality: sum of `1 / d` over every other vertex that can
/// reach the vertex. Directed graphs measure incoming distance.
///
/// # Errors
/// Returns [`crate::AlgorithmError::NegativeWeight`] if a weight is negative.
#[instrument(
    name = "centrality.harmonic",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
pub fn harmonic_centrality(graph: &Graph) -> Result<CentralityScores> {
    distance_measure(graph, "harmonic", |distances| {
        distances
            .iter()
            .filter(|d| d.is_finite() && **d > 0.0)
            .map(|d| 1.0 / d)
            .sum()
    })
}

fn distance_measure<F>(graph: &Graph, algorithm: &'static str, score: F) -> Result<CentralityScores>
where
    F: Fn(&[f64]) -> f64,
{
    let indexed = graph.indexed();
    let metric = PathMetric::for_graph(&indexed, algorithm)?;
    let values = (0..indexed.len())
        .map(|v| score(&single_source(&indexed, v, metric, Direction::Reverse).distance))
        .collect();
    Ok(CentralityScores::from_indexed(&indexed, values))
}

#[expect(clippy::cast_precision_loss, reason = "vertex counts stay far below 2^52")]
fn count_as_f64(count: usize) -> f64 {
    count as f64
}
