//! Seeded synthetic graphs.
//!
//! Every generator is deterministic for a given seed so Criterion compares
//! like with like across runs.

use grafo_core::{Attributes, Graph, VertexId};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{error::BenchSetupError, params::SparseBenchParams};

/// Range of the uniformly drawn edge weights.
const WEIGHT_RANGE: std::ops::Range<f64> = 1.0..10.0;

/// Side of the square cities are scattered over.
const CITY_SPREAD: f64 = 100.0;

/// Configuration for [`sparse_random`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntheticGraphConfig {
    /// Vertex count and mean degree.
    pub params: SparseBenchParams,
    /// Whether edges are arcs.
    pub directed: bool,
    /// RNG seed.
    pub seed: u64,
}

fn vertex(index: usize) -> Result<VertexId, BenchSetupError> {
    u32::try_from(index)
        .map(VertexId::from)
        .map_err(|_| BenchSetupError::InvalidParameter {
            name: "vertex_count",
            reason: "must fit in u32",
        })
}

fn empty(name: &str, vertex_count: usize, directed: bool) -> Result<Graph, BenchSetupError> {
    let mut graph = if directed {
        Graph::directed(name)
    } else {
        Graph::undirected(name)
    };
    for index in 0..vertex_count {
        graph.add_vertex(vertex(index)?, Attributes::new())?;
    }
    Ok(graph)
}

/// Builds a connected random graph: a path `0 - 1 - ... - (n-1)` plus
/// Erdős–Rényi edges drawn so each vertex has about `mean_degree`
/// neighbours. Weights are uniform in `[1, 10)`.
///
/// # Errors
/// Returns [`BenchSetupError::InvalidParameter`] for fewer than two vertices.
///
/// # Examples
/// ```
/// use grafo_benches::{
///     params::SparseBenchParams,
///     source::{SyntheticGraphConfig, sparse_random},
/// };
///
/// let graph = sparse_random(&SyntheticGraphConfig {
///     params: SparseBenchParams { vertex_count: 50, mean_degree: 4 },
///     directed: false,
///     seed: 7,
/// })?;
/// assert_eq!(graph.vertex_count(), 50);
/// assert_eq!(graph.connected_components().len(), 1);
/// # Ok::<(), grafo_benches::error::BenchSetupError>(())
/// ```
pub fn sparse_random(config: &SyntheticGraphConfig) -> Result<Graph, BenchSetupError> {
    let SparseBenchParams {
        vertex_count,
        mean_degree,
    } = config.params;
    if vertex_count < 2 {
        return Err(BenchSetupError::InvalidParameter {
            name: "vertex_count",
            reason: "must be at least 2",
        });
    }
    let mut graph = empty("sparse_random", vertex_count, config.directed)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    for index in 1..vertex_count {
        let weight = rng.gen_range(WEIGHT_RANGE);
        graph.add_edge(vertex(index - 1)?, vertex(index)?, weight, Attributes::new())?;
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "benchmark sizes are far below f64 precision limits"
    )]
    let probability = (mean_degree as f64 / (vertex_count - 1) as f64).min(1.0);
    for s in 0..vertex_count {
        for t in (s + 2)..vertex_count {
            if rng.gen_bool(probability) {
                let weight = rng.gen_range(WEIGHT_RANGE);
                let (s, t) = if config.directed && rng.gen_bool(0.5) { (t, s) } else { (s, t) };
                graph.add_edge(vertex(s)?, vertex(t)?, weight, Attributes::new())?;
            }
        }
    }
    Ok(graph)
}

/// Builds a complete undirected graph over `city_count` random points,
/// weighted by Euclidean distance.
///
/// # Errors
/// Returns [`BenchSetupError::InvalidParameter`] for fewer than three cities.
pub fn euclidean_complete(city_count: usize, seed: u64) -> Result<Graph, BenchSetupError> {
    if city_count < 3 {
        return Err(BenchSetupError::InvalidParameter {
            name: "city_count",
            reason: "must be at least 3",
        });
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let points: Vec<(f64, f64)> = (0..city_count)
        .map(|_| (rng.gen_range(0.0..CITY_SPREAD), rng.gen_range(0.0..CITY_SPREAD)))
        .collect();
    let mut graph = empty("euclidean_complete", city_count, false)?;
    for (s, &(xs, ys)) in points.iter().enumerate() {
        for (t, &(xt, yt)) in points.iter().enumerate().skip(s + 1) {
            let distance = (xs - xt).hypot(ys - yt);
            graph.add_edge(vertex(s)?, vertex(t)?, distance, Attributes::new())?;
        }
    }
    Ok(graph)
}
