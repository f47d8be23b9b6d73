//! Benchmark parameter types, rendered into Criterion ids.

use std::fmt;

/// Size of a sparse random graph benchmark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparseBenchParams {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Expected degree of each vertex.
    pub mean_degree: usize,
}

impl fmt::Display for SparseBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},d={}", self.vertex_count, self.mean_degree)
    }
}

/// Size of a complete Euclidean graph benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EuclideanBenchParams {
    /// Number of cities.
    pub city_count: usize,
}

impl fmt::Display for EuclideanBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cities={}", self.city_count)
    }
}
