//! Spectral analysis: Laplacian and adjacency spectra, connectivity and
//! clustering.
//!
//! Matrices are built from the symmetrized weighted adjacency, so a directed
//! edge contributes to both `A[s][t]` and `A[t][s]`. Eigenvalues come from
//! nalgebra's symmetric eigen-solver and are reported in ascending order.

mod clustering;
mod kmeans;

use nalgebra::{DMatrix, SymmetricEigen};
use tracing::{debug, instrument};

pub use self::clustering::{SpectralConfig, spectral_clustering, spectral_communities};
use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph},
};

/// Eigenvalues with absolute value at or below this are treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-9;

fn adjacency_of(graph: &IndexedGraph) -> DMatrix<f64> {
    let weights = graph.symmetric_weights();
    DMatrix::from_fn(graph.len(), graph.len(), |i, j| weights[i][j])
}

fn laplacian_of(graph: &IndexedGraph) -> DMatrix<f64> {
    let adjacency = adjacency_of(graph);
    let mut laplacian = -adjacency.clone();
    for (i, row) in adjacency.row_iter().enumerate() {
        laplacian[(i, i)] += row.sum();
    }
    laplacian
}

/// Symmetrized weighted adjacency matrix in natural vertex order.
#[must_use]
pub fn adjacency_matrix(graph: &Graph) -> DMatrix<f64> {
    adjacency_of(&graph.indexed())
}

/// Combinatorial Laplacian `L = D - A` in natural vertex order.
///
/// Self-loops add to both `D` and `A` and therefore cancel.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, spectral::laplacian_matrix};
///
/// let mut graph = Graph::undirected("edge");
/// graph.add_vertex("a", Attributes::new())?;
/// graph.add_vertex("b", Attributes::new())?;
/// graph.add_edge("a", "b", 2.0, Attributes::new())?;
/// let laplacian = laplacian_matrix(&graph);
/// assert_eq!(laplacian[(0, 0)], 2.0);
/// assert_eq!(laplacian[(0, 1)], -2.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn laplacian_matrix(graph: &Graph) -> DMatrix<f64> {
    laplacian_of(&graph.indexed())
}

/// Normalized Laplacian `I - D^-1/2 A D^-1/2`.
///
/// Isolated vertices get an all-zero row, so each component still
/// contributes exactly one zero eigenvalue.
#[must_use]
pub fn normalized_laplacian_matrix(graph: &Graph) -> DMatrix<f64> {
    let adjacency = adjacency_of(&graph.indexed());
    let scale: Vec<f64> = adjacency
        .row_iter()
        .map(|row| {
            let degree = row.sum();
            if degree > 0.0 { degree.sqrt().recip() } else { 0.0 }
        })
        .collect();
    let n = adjacency.nrows();
    DMatrix::from_fn(n, n, |i, j| {
        let off = adjacency[(i, j)] * scale[i] * scale[j];
        if i == j && scale[i] > 0.0 { 1.0 - off } else { -off }
    })
}

/// Eigenvalues and matching eigenvector columns, both sorted ascending by
/// eigenvalue.
pub(crate) fn sorted_eigen(matrix: DMatrix<f64>) -> (Vec<f64>, DMatrix<f64>) {
    let n = matrix.nrows();
    if n == 0 {
        return (Vec::new(), matrix);
    }
    let eigen = SymmetricEigen::new(matrix);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
    let values = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let vectors = DMatrix::from_fn(n, n, |row, column| eigen.eigenvectors[(row, order[column])]);
    (values, vectors)
}

fn sorted_eigenvalues(matrix: DMatrix<f64>) -> Vec<f64> {
    if matrix.nrows() == 0 {
        return Vec::new();
    }
    let mut values: Vec<f64> = matrix.symmetric_eigenvalues().iter().copied().collect();
    values.sort_by(f64::total_cmp);
    values
}

/// Laplacian eigenvalues in ascending order. Empty for an empty graph.
#[instrument(
    name = "spectral.laplacian_spectrum",
    level = "debug",
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
#[must_use]
pub fn laplacian_spectrum(graph: &Graph) -> Vec<f64> {
    sorted_eigenvalues(laplacian_matrix(graph))
}

/// Normalized Laplacian eigenvalues in ascending order; all lie in `[0, 2]`
/// for non-negative weights.
#[must_use]
pub fn normalized_laplacian_spectrum(graph: &Graph) -> Vec<f64> {
    sorted_eigenvalues(normalized_laplacian_matrix(graph))
}

/// Adjacency eigenvalues in ascending order.
#[must_use]
pub fn adjacency_spectrum(graph: &Graph) -> Vec<f64> {
    sorted_eigenvalues(adjacency_matrix(graph))
}

/// Graph energy: the sum of absolute adjacency eigenvalues.
#[must_use]
pub fn spectral_energy(graph: &Graph) -> f64 {
    adjacency_spectrum(graph).iter().map(|value| value.abs()).sum()
}

/// Second-smallest Laplacian eigenvalue (the Fiedler value).
///
/// Zero exactly when the graph is disconnected, up to [`ZERO_TOLERANCE`]. A
/// single vertex scores 0.
///
/// # Errors
/// Returns [`AlgorithmError::EmptyGraph`] for an empty graph.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, spectral::algebraic_connectivity};
///
/// let mut graph = Graph::undirected("k3");
/// for id in 0..3 {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// for (a, b) in [(0, 1), (1, 2), (2, 0)] {
///     graph.add_edge(a, b, 1.0, Attributes::new())?;
/// }
/// assert!((algebraic_connectivity(&graph)? - 3.0).abs() < 1e-9);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(name = "spectral.algebraic_connectivity", level = "debug", err, skip(graph))]
pub fn algebraic_connectivity(graph: &Graph) -> Result<f64> {
    if graph.is_empty() {
        return Err(AlgorithmError::EmptyGraph {
            algorithm: "algebraic_connectivity",
        });
    }
    let spectrum = laplacian_spectrum(graph);
    let value = spectrum.get(1).copied().unwrap_or(0.0);
    let value = if value.abs() <= ZERO_TOLERANCE { 0.0 } else { value };
    debug!(fiedler = value, "algebraic connectivity");
    Ok(value)
}

/// Number of connected components read off the Laplacian spectrum: the count
/// of eigenvalues within [`ZERO_TOLERANCE`] of zero.
#[must_use]
pub fn spectral_component_count(graph: &Graph) -> usize {
    laplacian_spectrum(graph)
        .iter()
        .filter(|value| value.abs() <= ZERO_TOLERANCE)
        .count()
}

/// Euclidean distance between the ascending Laplacian spectra of two graphs.
///
/// The smaller spectrum is padded with leading zeros, as if the smaller graph
/// had extra isolated vertices.
#[must_use]
pub fn spectral_distance(left: &Graph, right: &Graph) -> f64 {
    let a = laplacian_spectrum(left);
    let b = laplacian_spectrum(right);
    let width = a.len().max(b.len());
    let pad = |spectrum: Vec<f64>| -> Vec<f64> {
        std::iter::repeat_n(0.0, width - spectrum.len())
            .chain(spectrum)
            .collect()
    };
    let (a, b) = (pad(a), pad(b));
    a.iter()
        .zip(&b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests;
