//! Girvan-Newman divisive clustering.

use tracing::{debug, instrument};

use super::{CommunityDetection, CommunityGraph, CommunityLevel, Partition, relabel};
use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph},
    paths::{PathMetric, raw_edge_betweenness},
    union_find::DisjointSet,
};

/// Girvan-Newman community detection.
///
/// Repeatedly removes the edge with the highest hop-count edge betweenness,
/// recomputing betweenness after every removal. Scores within `1e-9` of the
/// maximum are treated as equal and the earliest edge wins. The connected
/// components are recorded whenever their number changes.
///
/// Without `target` the recorded partition with the highest modularity is
/// returned (the earliest on ties). With `target` the first partition with
/// at least that many communities is returned; a disconnected graph may
/// already exceed it.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph,
/// [`AlgorithmError::InvalidParameter`] when `target` is zero or exceeds the
/// vertex count, and [`AlgorithmError::NegativeWeight`] for a negative
/// weight.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, community::girvan_newman};
///
/// let mut graph = Graph::undirected("barbell");
/// for id in 0..6 {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// for (a, b) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)] {
///     graph.add_edge(a, b, 1.0, Attributes::new())?;
/// }
/// let detected = girvan_newman(&graph, None)?;
/// assert_eq!(detected.partition.community_count(), 2);
/// assert_eq!(detected.partition.community(&3.into()), Some(1));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "community.girvan_newman",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn girvan_newman(graph: &Graph, target: Option<usize>) -> Result<CommunityDetection> {
    if graph.is_empty() {
        return Err(AlgorithmError::EmptyGraph {
            algorithm: "girvan_newman",
        });
    }
    if let Some(count) = target {
        if count == 0 || count > graph.vertex_count() {
            return Err(AlgorithmError::invalid_parameter(
                "communities",
                format!("must lie within 1..={}", graph.vertex_count()),
            ));
        }
    }
    let indexed = graph.indexed();
    let network = CommunityGraph::from_indexed(&indexed, "girvan_newman")?;
    let adjacency = indexed.simple_adjacency();
    let mut remaining: Vec<(usize, usize, f64)> = adjacency
        .iter()
        .enumerate()
        .flat_map(|(s, list)| list.iter().filter(move |&&t| s < t).map(move |&t| (s, t, 1.0)))
        .collect();

    let mut levels = Vec::new();
    let mut best: Option<(Vec<usize>, f64)> = None;
    let mut last_count = 0;
    loop {
        let (labels, count) = components(indexed.len(), &remaining);
        if count != last_count {
            last_count = count;
            let quality = network.modularity(&labels, 1.0);
            debug!(communities = count, modularity = quality, "girvan-newman level");
            levels.push(CommunityLevel {
                community_count: count,
                modularity: quality,
            });
            if target.is_some_and(|wanted| count >= wanted) {
                best = Some((labels, quality));
                break;
            }
            let improves = best.as_ref().is_none_or(|(_, current)| quality > *current);
            if target.is_none() && improves {
                best = Some((labels, quality));
            }
        }
        if remaining.is_empty() {
            break;
        }
        let working = IndexedGraph::from_edges(indexed.ids().to_vec(), false, remaining.clone());
        let scores = raw_edge_betweenness(&working, PathMetric::Hops);
        let peak = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let threshold = peak - 1e-9 * peak.abs().max(1.0);
        let position = scores.iter().position(|&score| score >= threshold).unwrap_or(0);
        remaining.remove(position);
    }

    let (labels, quality) = best.unwrap_or_else(|| (vec![0; indexed.len()], 0.0));
    Ok(CommunityDetection {
        partition: Partition::from_labels(indexed.ids(), &labels),
        modularity: quality,
        levels,
    })
}

/// Connected-component labels of the remaining edges.
fn components(n: usize, edges: &[(usize, usize, f64)]) -> (Vec<usize>, usize) {
    let mut forest = DisjointSet::new(n);
    for &(s, t, _) in edges {
        forest.union(s, t);
    }
    let roots: Vec<usize> = (0..n).map(|v| forest.find(v)).collect();
    relabel(&roots)
}
