//! Kruskal minimum spanning tree over a dense weight matrix.
//!
//! Candidate edges are sorted by `(weight, source, target)` so ties resolve
//! the same way on every run, then accepted in order whenever they join two
//! separate trees of the disjoint-set forest.

use std::cmp::Ordering;

use crate::union_find::DisjointSet;

/// Undirected tree edge with canonical `source < target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct TreeEdge {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) weight: f64,
}

impl Eq for TreeEdge {}

impl Ord for TreeEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.source.cmp(&other.source))
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl PartialOrd for TreeEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "parallel")]
fn sort_candidates(edges: &mut [TreeEdge]) {
    use rayon::prelude::*;

    edges.par_sort_unstable();
}

#[cfg(not(feature = "parallel"))]
fn sort_candidates(edges: &mut [TreeEdge]) {
    edges.sort_unstable();
}

/// Spanning tree of the complete graph described by `weights`, which must be
/// symmetric. Edges come back sorted by source then target.
pub(super) fn spanning_tree(weights: &[Vec<f64>]) -> Vec<TreeEdge> {
    let n = weights.len();
    let mut candidates: Vec<TreeEdge> = (0..n)
        .flat_map(|source| {
            ((source + 1)..n).map(move |target| TreeEdge {
                source,
                target,
                weight: weights[source][target],
            })
        })
        .collect();
    sort_candidates(&mut candidates);

    let mut forest = DisjointSet::new(n);
    let mut tree = Vec::with_capacity(n.saturating_sub(1));
    for edge in candidates {
        if forest.union(edge.source, edge.target) {
            tree.push(edge);
            if forest.set_count() == 1 {
                break;
            }
        }
    }
    tree.sort_unstable_by_key(|edge| (edge.source, edge.target));
    tree
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::spanning_tree;

    #[rstest]
    fn picks_the_cheapest_edges() {
        let weights = vec![
            vec![0.0, 1.0, 4.0, 3.0],
            vec![1.0, 0.0, 2.0, 5.0],
            vec![4.0, 2.0, 0.0, 6.0],
            vec![3.0, 5.0, 6.0, 0.0],
        ];
        let tree = spanning_tree(&weights);
        let pairs: Vec<(usize, usize)> = tree.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 2)]);
        let total: f64 = tree.iter().map(|e| e.weight).sum();
        assert!((total - 6.0).abs() < 1e-12);
    }

    #[rstest]
    fn equal_weights_break_ties_by_endpoints() {
        let weights = vec![vec![1.0; 3]; 3];
        let tree = spanning_tree(&weights);
        let pairs: Vec<(usize, usize)> = tree.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2)]);
    }

    #[rstest]
    #[case::empty(0)]
    #[case::single(1)]
    fn trivial_inputs_have_no_edges(#[case] n: usize) {
        assert!(spanning_tree(&vec![vec![0.0; n]; n]).is_empty());
    }
}
