//! Louvain modularity optimisation.

use tracing::{debug, instrument};

use super::{CommunityDetection, CommunityGraph, CommunityLevel, Partition, relabel};
use crate::{
    convergence::IterationControl,
    error::{AlgorithmError, Result},
    graph::Graph,
};

/// Louvain parameters.
///
/// `control.max_iterations()` caps the local-moving sweeps per level and
/// `control.tolerance()` is the smallest modularity gain that justifies
/// another level.
///
/// # Examples
/// ```
/// use grafo_core::community::LouvainConfig;
///
/// let config = LouvainConfig::default().with_resolution(0.5);
/// assert_eq!(config.resolution(), 0.5);
/// assert_eq!(config.control().max_iterations(), 100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LouvainConfig {
    resolution: f64,
    control: IterationControl,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            control: IterationControl::new(100, 1e-7),
        }
    }
}

impl LouvainConfig {
    /// Overrides the resolution; values above 1.0 favour smaller
    /// communities.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Overrides the sweep cap and level tolerance.
    #[must_use]
    pub const fn with_control(mut self, control: IterationControl) -> Self {
        self.control = control;
        self
    }

    /// Resolution parameter `gamma`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn resolution(&self) -> f64 { self.resolution }

    /// Sweep cap and level tolerance.
    #[must_use]
    #[rustfmt::skip]
    pub const fn control(&self) -> IterationControl { self.control }
}

/// Louvain community detection.
///
/// Vertices are visited in ascending id order. A vertex joins the
/// neighbouring community with the largest strictly positive modularity
/// gain; equal gains go to the community seeded by the lowest vertex id.
/// Communities are then collapsed and the process repeats until a level
/// moves nothing or gains less than the tolerance. Reaching the sweep cap
/// ends the level early but is not an error.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph,
/// [`AlgorithmError::InvalidParameter`] for a non-positive or non-finite
/// resolution and [`AlgorithmError::NegativeWeight`] for a negative weight.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, community::{LouvainConfig, louvain}};
///
/// let mut graph = Graph::undirected("two-triangles");
/// for id in 0..6 {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// for (a, b) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)] {
///     graph.add_edge(a, b, 1.0, Attributes::new())?;
/// }
/// let detected = louvain(&graph, LouvainConfig::default())?;
/// assert_eq!(detected.partition.community_count(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "community.louvain",
    level = "debug",
    err,
    skip(graph, config),
    fields(vertices = graph.vertex_count(), resolution = config.resolution)
)]
pub fn louvain(graph: &Graph, config: LouvainConfig) -> Result<CommunityDetection> {
    if graph.is_empty() {
        return Err(AlgorithmError::EmptyGraph { algorithm: "louvain" });
    }
    if !(config.resolution.is_finite() && config.resolution > 0.0) {
        return Err(AlgorithmError::invalid_parameter(
            "resolution",
            "must be positive and finite",
        ));
    }
    let indexed = graph.indexed();
    let original = CommunityGraph::from_indexed(&indexed, "louvain")?;
    let mut rank = indexed.id_ranks();
    let mut membership: Vec<usize> = (0..indexed.len()).collect();
    let mut network = original.clone();
    let mut quality = original.modularity(&membership, config.resolution);
    let mut levels = vec![CommunityLevel {
        community_count: indexed.len(),
        modularity: quality,
    }];

    while network.total() > 0.0 {
        let Some(labels) = move_vertices(&network, &rank, config) else {
            break;
        };
        let (labels, count) = relabel(&labels);
        let candidate: Vec<usize> = membership.iter().map(|&node| labels[node]).collect();
        let gained = original.modularity(&candidate, config.resolution);
        if gained - quality <= config.control.tolerance() {
            break;
        }
        debug!(communities = count, modularity = gained, "louvain level");
        membership = candidate;
        quality = gained;
        levels.push(CommunityLevel {
            community_count: count,
            modularity: quality,
        });
        let mut coarse_rank = vec![usize::MAX; count];
        for (node, &label) in labels.iter().enumerate() {
            coarse_rank[label] = coarse_rank[label].min(rank[node]);
        }
        network = network.aggregate(&labels, count);
        rank = coarse_rank;
    }

    Ok(CommunityDetection {
        partition: Partition::from_labels(indexed.ids(), &membership),
        modularity: quality,
        levels,
    })
}

/// Local moving phase on one level. Returns the per-node community labels,
/// or `None` when no node moved.
fn move_vertices(
    network: &CommunityGraph,
    rank: &[usize],
    config: LouvainConfig,
) -> Option<Vec<usize>> {
    let n = network.len();
    let total = network.total();
    let gamma = config.resolution;
    let mut community: Vec<usize> = (0..n).collect();
    let mut community_strength: Vec<f64> = (0..n).map(|v| network.strength(v)).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&v| rank[v]);
    let mut links = vec![0.0; n];
    let mut touched: Vec<usize> = Vec::new();
    let mut moved_any = false;

    for _ in 0..config.control.max_iterations() {
        let mut moved = false;
        for &vertex in &order {
            let strength = network.strength(vertex);
            let own = community[vertex];
            for &(other, weight) in network.neighbours(vertex) {
                let target = community[other];
                if links[target] == 0.0 {
                    touched.push(target);
                }
                links[target] += weight;
            }
            community_strength[own] -= strength;
            // Gains are scaled by m; staying put scores zero.
            let removal = -links[own] + gamma * community_strength[own] * strength / total;
            touched.sort_by_key(|&c| rank[c]);
            touched.dedup();
            let mut best = own;
            let mut best_gain = 0.0;
            for &candidate in &touched {
                let gain = removal + links[candidate]
                    - gamma * community_strength[candidate] * strength / total;
                if gain > best_gain + f64::EPSILON * total.max(1.0) {
                    best = candidate;
                    best_gain = gain;
                }
            }
            community_strength[best] += strength;
            if best != own {
                community[vertex] = best;
                moved = true;
            }
            for &c in &touched {
                links[c] = 0.0;
            }
            touched.clear();
        }
        moved_any |= moved;
        if !moved {
            break;
        }
    }
    moved_any.then_some(community)
}
