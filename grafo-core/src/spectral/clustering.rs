//! Spectral clustering and modularity-driven spectral communities.

use nalgebra::DMatrix;
use tracing::{debug, instrument};

use super::{kmeans::kmeans, laplacian_of, sorted_eigen};
use crate::{
    community::{CommunityDetection, CommunityGraph, CommunityLevel, Partition},
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph},
};

/// Spectral clustering parameters.
///
/// # Examples
/// ```
/// use grafo_core::spectral::SpectralConfig;
///
/// let config = SpectralConfig::default().with_max_communities(4);
/// assert_eq!(config.max_communities(), 4);
/// assert_eq!(config.kmeans_iterations(), 100);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpectralConfig {
    kmeans_iterations: usize,
    max_communities: usize,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            kmeans_iterations: 100,
            max_communities: 10,
        }
    }
}

impl SpectralConfig {
    /// Overrides the k-means iteration cap.
    #[must_use]
    pub const fn with_kmeans_iterations(mut self, iterations: usize) -> Self {
        self.kmeans_iterations = iterations;
        self
    }

    /// Overrides the largest community count tried by
    /// [`spectral_communities`].
    #[must_use]
    pub const fn with_max_communities(mut self, max: usize) -> Self {
        self.max_communities = max;
        self
    }

    /// Lloyd iteration cap.
    #[must_use]
    #[rustfmt::skip]
    pub const fn kmeans_iterations(&self) -> usize { self.kmeans_iterations }

    /// Largest community count tried by [`spectral_communities`].
    #[must_use]
    #[rustfmt::skip]
    pub const fn max_communities(&self) -> usize { self.max_communities }
}

/// Row `i` holds vertex `i`'s coordinates in the `k` eigenvectors of smallest
/// eigenvalue. Each eigenvector's sign is fixed so its first clearly
/// non-zero entry is positive.
fn embedding(vectors: &DMatrix<f64>, k: usize) -> DMatrix<f64> {
    let n = vectors.nrows();
    let signs: Vec<f64> = (0..k)
        .map(|column| {
            vectors
                .column(column)
                .iter()
                .find(|value| value.abs() > super::ZERO_TOLERANCE)
                .map_or(1.0, |value| value.signum())
        })
        .collect();
    DMatrix::from_fn(n, k, |row, column| vectors[(row, column)] * signs[column])
}

/// Splits the vertices into `k` clusters.
///
/// Vertices are embedded with the `k` Laplacian eigenvectors of smallest
/// eigenvalue and grouped by k-means with farthest-point seeding. Duplicate
/// embeddings can yield fewer than `k` clusters.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph and
/// [`AlgorithmError::InvalidParameter`] when `k` is zero or exceeds the vertex
/// count.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, spectral::{SpectralConfig, spectral_clustering}};
///
/// let mut graph = Graph::undirected("two-edges");
/// for id in 0..4 {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge(0, 1, 1.0, Attributes::new())?;
/// graph.add_edge(2, 3, 1.0, Attributes::new())?;
/// let partition = spectral_clustering(&graph, 2, SpectralConfig::default())?;
/// assert_eq!(partition.community(&1.into()), partition.community(&0.into()));
/// assert_ne!(partition.community(&2.into()), partition.community(&0.into()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(name = "spectral.clustering", level = "debug", err, skip(graph, config))]
pub fn spectral_clustering(graph: &Graph, k: usize, config: SpectralConfig) -> Result<Partition> {
    if graph.is_empty() {
        return Err(AlgorithmError::EmptyGraph {
            algorithm: "spectral_clustering",
        });
    }
    if k == 0 || k > graph.vertex_count() {
        return Err(AlgorithmError::invalid_parameter(
            "k",
            format!("must lie within 1..={}", graph.vertex_count()),
        ));
    }
    let indexed = graph.indexed();
    let (_, vectors) = sorted_eigen(laplacian_of(&indexed));
    Ok(cluster(&indexed, &vectors, k, config))
}

fn cluster(
    indexed: &IndexedGraph,
    vectors: &DMatrix<f64>,
    k: usize,
    config: SpectralConfig,
) -> Partition {
    let points = embedding(vectors, k);
    let labels = kmeans(&points, k, config.kmeans_iterations);
    Partition::from_labels(indexed.ids(), &labels)
}

/// Spectral community detection: clusters with every `k` from 2 to
/// `min(max_communities, n / 2)` and keeps the partition of highest
/// modularity (smallest `k` on ties).
///
/// Graphs with fewer than four vertices yield a single community.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph and
/// [`AlgorithmError::NegativeWeight`] for a negative weight.
#[instrument(name = "spectral.communities", level = "debug", err, skip(graph, config))]
pub fn spectral_communities(graph: &Graph, config: SpectralConfig) -> Result<CommunityDetection> {
    if graph.is_empty() {
        return Err(AlgorithmError::EmptyGraph {
            algorithm: "spectral_communities",
        });
    }
    let indexed = graph.indexed();
    let network = CommunityGraph::from_indexed(&indexed, "spectral_communities")?;
    let (_, vectors) = sorted_eigen(laplacian_of(&indexed));
    let upper = config.max_communities.min(indexed.len() / 2);

    let together = vec![0; indexed.len()];
    let single = Partition::from_labels(indexed.ids(), &together);
    let single_quality = network.modularity(&together, 1.0);
    let mut levels = Vec::new();
    let mut best: Option<(Partition, f64)> = None;
    for k in 2..=upper {
        let partition = cluster(&indexed, &vectors, k, config);
        let labels: Vec<usize> = partition.assignments().values().copied().collect();
        let quality = network.modularity(&labels, 1.0);
        debug!(
            k,
            communities = partition.community_count(),
            modularity = quality,
            "spectral candidate"
        );
        levels.push(CommunityLevel {
            community_count: partition.community_count(),
            modularity: quality,
        });
        if best.as_ref().is_none_or(|(_, current)| quality > *current) {
            best = Some((partition, quality));
        }
    }
    let (partition, modularity) = best.unwrap_or((single, single_quality));
    Ok(CommunityDetection {
        partition,
        modularity,
        levels,
    })
}
