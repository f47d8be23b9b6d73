//! Disjoint-set forest with path compression and union by rank.
//!
//! Backs component labelling in the graph model and cycle checks in the
//! Kruskal spanning tree used by the TSP module.

#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            sets: n,
        }
    }

    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the sets holding `left` and `right`. Returns `false` when they
    /// were already joined.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> bool {
        let mut keep = self.find(left);
        let mut absorb = self.find(right);
        if keep == absorb {
            return false;
        }
        if self.rank[keep] < self.rank[absorb] {
            std::mem::swap(&mut keep, &mut absorb);
        }
        self.parent[absorb] = keep;
        if self.rank[keep] == self.rank[absorb] {
            self.rank[keep] = self.rank[keep].saturating_add(1);
        }
        self.sets -= 1;
        true
    }

    /// Number of disjoint sets.
    pub(crate) const fn set_count(&self) -> usize {
        self.sets
    }
}
