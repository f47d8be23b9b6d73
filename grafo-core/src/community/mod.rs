//! Community detection: Girvan-Newman, Louvain and modularity scoring.
//!
//! Every routine works on the underlying undirected weighted graph. Directed
//! edges are symmetrized and antiparallel pairs sum their weights. Negative
//! weights are rejected because modularity is undefined for them.
//!
//! Community ids are contiguous, `0..k`, numbered by first appearance in
//! natural vertex order.

mod girvan_newman;
mod louvain;
mod quality;

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::instrument;

pub use self::{
    girvan_newman::girvan_newman,
    louvain::{LouvainConfig, louvain},
    quality::{PartitionAgreement, adjusted_rand_index, normalized_mutual_information, partition_agreement},
};
use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

/// Assignment of every vertex to a community.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, community::Partition};
///
/// let mut graph = Graph::undirected("pair");
/// graph.add_vertex("a", Attributes::new())?;
/// graph.add_vertex("b", Attributes::new())?;
/// let partition = Partition::from_communities(&graph, &[vec!["b".into()], vec!["a".into()]])?;
/// // Ids follow natural vertex order, not the order communities were listed.
/// assert_eq!(partition.community(&"a".into()), Some(0));
/// assert_eq!(partition.community_count(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Partition {
    assignments: IndexMap<VertexId, usize>,
    community_count: usize,
}

impl Partition {
    /// Builds a partition from positional labels, renumbering them by first
    /// appearance.
    pub(crate) fn from_labels(ids: &[VertexId], labels: &[usize]) -> Self {
        let (labels, community_count) = relabel(labels);
        Self {
            assignments: ids.iter().cloned().zip(labels).collect(),
            community_count,
        }
    }

    /// Builds a partition from explicit vertex groups.
    ///
    /// # Errors
    /// Returns [`AlgorithmError::VertexNotFound`] for a vertex outside the
    /// graph and [`AlgorithmError::InvalidSolution`] when a vertex is listed
    /// twice or not at all.
    pub fn from_communities(graph: &Graph, communities: &[Vec<VertexId>]) -> Result<Self> {
        let indexed = graph.indexed();
        let mut labels: Vec<Option<usize>> = vec![None; indexed.len()];
        for (label, members) in communities.iter().enumerate() {
            for id in members {
                let index = indexed
                    .index_of(id)
                    .ok_or_else(|| AlgorithmError::VertexNotFound { vertex: id.clone() })?;
                if labels[index].replace(label).is_some() {
                    return Err(partition_error(id, "vertex belongs to more than one community"));
                }
            }
        }
        let labels = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                label.ok_or_else(|| partition_error(indexed.id(index), "vertex has no community"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_labels(indexed.ids(), &labels))
    }

    /// Community of a vertex.
    #[must_use]
    pub fn community(&self, id: &VertexId) -> Option<usize> {
        self.assignments.get(id).copied()
    }

    /// Number of communities.
    #[must_use]
    #[rustfmt::skip]
    pub const fn community_count(&self) -> usize { self.community_count }

    /// Vertex to community mapping in natural vertex order.
    #[must_use]
    pub const fn assignments(&self) -> &IndexMap<VertexId, usize> {
        &self.assignments
    }

    /// Members of each community; community `c` is at position `c`.
    #[must_use]
    pub fn communities(&self) -> Vec<Vec<VertexId>> {
        let mut groups = vec![Vec::new(); self.community_count];
        for (id, &community) in &self.assignments {
            if let Some(group) = groups.get_mut(community) {
                group.push(id.clone());
            }
        }
        groups
    }

    /// Number of assigned vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` when no vertex is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Modularity after one merge level of a hierarchical method.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CommunityLevel {
    /// Communities at this level.
    pub community_count: usize,
    /// Modularity of the level's partition.
    pub modularity: f64,
}

/// Output of a community detection run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommunityDetection {
    /// Selected partition.
    pub partition: Partition,
    /// Modularity of [`Self::partition`].
    pub modularity: f64,
    /// Every partition the method visited, in visiting order.
    pub levels: Vec<CommunityLevel>,
}

/// Weighted modularity of `partition` with resolution 1.0.
///
/// # Errors
/// Returns [`AlgorithmError::InvalidSolution`] when the partition misses a
/// vertex of `graph` and [`AlgorithmError::NegativeWeight`] for a negative
/// edge weight.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, community::{Partition, modularity}};
///
/// let mut graph = Graph::undirected("two-pairs");
/// for id in 0..4 {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge(0, 1, 1.0, Attributes::new())?;
/// graph.add_edge(2, 3, 1.0, Attributes::new())?;
/// let partition = Partition::from_communities(&graph, &[vec![0.into(), 1.into()], vec![2.into(), 3.into()]])?;
/// assert!((modularity(&graph, &partition)? - 0.5).abs() < 1e-12);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn modularity(graph: &Graph, partition: &Partition) -> Result<f64> {
    modularity_with_resolution(graph, partition, 1.0)
}

/// Weighted modularity with a resolution parameter `gamma`:
/// `Q = sum_c [in_c / 2m - gamma * (tot_c / 2m)^2]`.
///
/// A graph without edges scores 0.
///
/// # Errors
/// As [`modularity`].
#[instrument(name = "community.modularity", level = "debug", err, skip(graph, partition))]
pub fn modularity_with_resolution(graph: &Graph, partition: &Partition, resolution: f64) -> Result<f64> {
    let indexed = graph.indexed();
    let labels = indexed
        .ids()
        .iter()
        .map(|id| {
            partition
                .community(id)
                .ok_or_else(|| partition_error(id, "vertex has no community"))
        })
        .collect::<Result<Vec<_>>>()?;
    let network = CommunityGraph::from_indexed(&indexed, "modularity")?;
    Ok(network.modularity(&labels, resolution))
}

fn partition_error(id: &VertexId, reason: &str) -> AlgorithmError {
    AlgorithmError::InvalidSolution {
        what: "partition",
        vertex: id.clone(),
        reason: reason.into(),
    }
}

/// Renumbers labels `0..k` by first appearance.
pub(crate) fn relabel(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping = BTreeMap::new();
    let relabelled = labels
        .iter()
        .map(|label| {
            let next = mapping.len();
            *mapping.entry(*label).or_insert(next)
        })
        .collect();
    (relabelled, mapping.len())
}

/// Symmetrized weighted adjacency with the bookkeeping modularity needs.
#[derive(Clone, Debug)]
pub(crate) struct CommunityGraph {
    /// Merged neighbours excluding the vertex itself, ascending by index.
    neighbours: Vec<Vec<(usize, f64)>>,
    /// `A_ii`; an undirected loop of weight `w` counts `2w`.
    self_weight: Vec<f64>,
    /// Weighted degree `k_i`.
    strength: Vec<f64>,
    /// `2m`.
    total: f64,
}

impl CommunityGraph {
    pub(crate) fn from_indexed(graph: &IndexedGraph, algorithm: &'static str) -> Result<Self> {
        let n = graph.len();
        let mut merged: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        let mut self_weight = vec![0.0; n];
        for &(s, t, weight) in graph.edges() {
            if weight < 0.0 {
                return Err(AlgorithmError::NegativeWeight {
                    algorithm,
                    from: graph.id(s).clone(),
                    to: graph.id(t).clone(),
                    weight,
                });
            }
            if s == t {
                self_weight[s] += 2.0 * weight;
            } else {
                *merged[s].entry(t).or_insert(0.0) += weight;
                *merged[t].entry(s).or_insert(0.0) += weight;
            }
        }
        let neighbours: Vec<Vec<(usize, f64)>> = merged
            .into_iter()
            .map(|map| map.into_iter().collect())
            .collect();
        Ok(Self::assemble(neighbours, self_weight))
    }

    fn assemble(neighbours: Vec<Vec<(usize, f64)>>, self_weight: Vec<f64>) -> Self {
        let strength: Vec<f64> = neighbours
            .iter()
            .zip(&self_weight)
            .map(|(list, own)| own + list.iter().map(|(_, w)| w).sum::<f64>())
            .collect();
        let total = strength.iter().sum();
        Self {
            neighbours,
            self_weight,
            strength,
            total,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.neighbours.len()
    }

    pub(crate) fn neighbours(&self, vertex: usize) -> &[(usize, f64)] {
        &self.neighbours[vertex]
    }

    pub(crate) fn strength(&self, vertex: usize) -> f64 {
        self.strength[vertex]
    }

    /// `2m`, the sum of all weighted degrees.
    #[rustfmt::skip]
    pub(crate) const fn total(&self) -> f64 { self.total }

    /// Modularity of arbitrary labels (not necessarily contiguous).
    pub(crate) fn modularity(&self, labels: &[usize], resolution: f64) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        let (labels, count) = relabel(labels);
        let mut inside = vec![0.0; count];
        let mut degree = vec![0.0; count];
        for (vertex, &label) in labels.iter().enumerate() {
            inside[label] += self.self_weight[vertex]
                + self.neighbours[vertex]
                    .iter()
                    .filter(|(other, _)| labels[*other] == label)
                    .map(|(_, w)| w)
                    .sum::<f64>();
            degree[label] += self.strength[vertex];
        }
        inside
            .iter()
            .zip(&degree)
            .map(|(inner, tot)| inner / self.total - resolution * (tot / self.total).powi(2))
            .sum()
    }

    /// Collapses each community into one vertex. `labels` must be contiguous
    /// `0..count`.
    pub(crate) fn aggregate(&self, labels: &[usize], count: usize) -> Self {
        let mut merged: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut self_weight = vec![0.0; count];
        for (vertex, &label) in labels.iter().enumerate() {
            self_weight[label] += self.self_weight[vertex];
            for &(other, weight) in &self.neighbours[vertex] {
                let target = labels[other];
                if target == label {
                    self_weight[label] += weight;
                } else {
                    *merged[label].entry(target).or_insert(0.0) += weight;
                }
            }
        }
        let neighbours = merged
            .into_iter()
            .map(|map| map.into_iter().collect())
            .collect();
        Self::assemble(neighbours, self_weight)
    }
}

#[cfg(test)]
mod tests;
