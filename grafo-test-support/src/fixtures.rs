//! Canonical graphs as edge lists over vertices `0..vertex_count`.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// An edge list over vertices numbered `0..vertex_count`.
///
/// # Examples
/// ```
/// use grafo_test_support::fixtures::GraphFixture;
///
/// let k5 = GraphFixture::complete(5);
/// assert_eq!(k5.vertex_count, 5);
/// assert_eq!(k5.edges.len(), 10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GraphFixture {
    /// Short human-readable name.
    pub name: String,
    /// Number of vertices; ids are `0..vertex_count`.
    pub vertex_count: usize,
    /// `(source, target, weight)` triples.
    pub edges: Vec<(usize, usize, f64)>,
}

impl GraphFixture {
    fn unit(
        name: impl Into<String>,
        vertex_count: usize,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            edges: pairs.into_iter().map(|(s, t)| (s, t, 1.0)).collect(),
        }
    }

    /// Path `0 - 1 - ... - (n-1)`.
    #[must_use]
    pub fn path(n: usize) -> Self {
        Self::unit(format!("P{n}"), n, (1..n).map(|v| (v - 1, v)))
    }

    /// Cycle `0 - 1 - ... - (n-1) - 0`.
    #[must_use]
    pub fn cycle(n: usize) -> Self {
        let mut fixture = Self::path(n);
        fixture.name = format!("C{n}");
        if n > 2 {
            fixture.edges.push((n - 1, 0, 1.0));
        }
        fixture
    }

    /// Complete graph on `n` vertices.
    #[must_use]
    pub fn complete(n: usize) -> Self {
        let pairs = (0..n).flat_map(|a| ((a + 1)..n).map(move |b| (a, b)));
        Self::unit(format!("K{n}"), n, pairs)
    }

    /// Complete bipartite graph with sides `0..left` and `left..left+right`.
    #[must_use]
    pub fn complete_bipartite(left: usize, right: usize) -> Self {
        let pairs = (0..left).flat_map(|a| (left..left + right).map(move |b| (a, b)));
        Self::unit(format!("K{left},{right}"), left + right, pairs)
    }

    /// Star with centre `0` and `leaves` leaves.
    #[must_use]
    pub fn star(leaves: usize) -> Self {
        Self::unit(format!("S{leaves}"), leaves + 1, (1..=leaves).map(|v| (0, v)))
    }

    /// `rows x cols` grid; vertex `r * cols + c`.
    #[must_use]
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut pairs = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let v = r * cols + c;
                if c + 1 < cols {
                    pairs.push((v, v + 1));
                }
                if r + 1 < rows {
                    pairs.push((v, v + cols));
                }
            }
        }
        Self::unit(format!("grid{rows}x{cols}"), rows * cols, pairs)
    }

    /// The Petersen graph: outer 5-cycle `0..5`, inner pentagram `5..10`.
    #[must_use]
    pub fn petersen() -> Self {
        let outer = (0..5).map(|v| (v, (v + 1) % 5));
        let spokes = (0..5).map(|v| (v, v + 5));
        let inner = (0..5).map(|v| (v + 5, (v + 2) % 5 + 5));
        Self::unit("petersen", 10, outer.chain(spokes).chain(inner))
    }

    /// Two triangles `{0,1,2}` and `{3,4,5}` joined by the bridge `2 - 3`.
    #[must_use]
    pub fn barbell() -> Self {
        Self::unit(
            "barbell",
            6,
            [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)],
        )
    }

    /// Two `K_size` blocks joined by the edge `size-1 - size`.
    #[must_use]
    pub fn two_cliques(size: usize) -> Self {
        let block = |offset: usize| {
            (0..size).flat_map(move |a| ((a + 1)..size).map(move |b| (a + offset, b + offset)))
        };
        let mut pairs: Vec<(usize, usize)> = block(0).chain(block(size)).collect();
        if size > 0 {
            pairs.push((size - 1, size));
        }
        Self::unit(format!("two-K{size}"), 2 * size, pairs)
    }

    /// Erdős–Rényi `G(n, p)` sample with a fixed seed.
    #[must_use]
    pub fn random(n: usize, probability: f64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut pairs = Vec::new();
        for a in 0..n {
            for b in (a + 1)..n {
                if rng.gen_bool(probability.clamp(0.0, 1.0)) {
                    pairs.push((a, b));
                }
            }
        }
        Self::unit(format!("gnp-{n}-{seed}"), n, pairs)
    }

    /// Complete graph over planar points weighted by Euclidean distance, which
    /// is always metric.
    #[must_use]
    pub fn euclidean(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut edges = Vec::new();
        for (a, &(ax, ay)) in points.iter().enumerate() {
            for (offset, &(bx, by)) in points.iter().skip(a + 1).enumerate() {
                edges.push((a, a + 1 + offset, (ax - bx).hypot(ay - by)));
            }
        }
        Self {
            name: format!("euclid-{n}"),
            vertex_count: n,
            edges,
        }
    }

    /// Sum of the unit degrees, i.e. `2 * |E|` for undirected graphs.
    #[must_use]
    pub fn degree_sum(&self) -> usize {
        2 * self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::GraphFixture;

    #[rstest]
    #[case::path(GraphFixture::path(4), 4, 3)]
    #[case::cycle(GraphFixture::cycle(4), 4, 4)]
    #[case::complete(GraphFixture::complete(5), 5, 10)]
    #[case::k33(GraphFixture::complete_bipartite(3, 3), 6, 9)]
    #[case::petersen(GraphFixture::petersen(), 10, 15)]
    #[case::grid(GraphFixture::grid(2, 3), 6, 7)]
    #[case::barbell(GraphFixture::barbell(), 6, 7)]
    #[case::two_cliques(GraphFixture::two_cliques(4), 8, 13)]
    fn fixtures_have_expected_sizes(
        #[case] fixture: GraphFixture,
        #[case] vertices: usize,
        #[case] edges: usize,
    ) {
        assert_eq!(fixture.vertex_count, vertices);
        assert_eq!(fixture.edges.len(), edges);
        assert!(
            fixture
                .edges
                .iter()
                .all(|&(s, t, _)| s < vertices && t < vertices && s != t)
        );
    }

    #[rstest]
    fn random_fixture_is_reproducible() {
        assert_eq!(GraphFixture::random(12, 0.3, 7), GraphFixture::random(12, 0.3, 7));
    }

    #[rstest]
    fn petersen_is_cubic() {
        let fixture = GraphFixture::petersen();
        let mut degree = [0_usize; 10];
        for &(s, t, _) in &fixture.edges {
            degree[s] += 1;
            degree[t] += 1;
        }
        assert!(degree.iter().all(|&d| d == 3));
    }
}
