//! Minimum-weight perfect matching on a complete graph of even order.
//!
//! Edmonds' blossom algorithm in its O(n^3) primal-dual form. Weights are
//! inverted against `1 + max weight` and the matcher maximises the inverted
//! weight over maximum-cardinality matchings. Every maximum-cardinality
//! matching of a complete graph with an even vertex count is perfect, so the
//! result is a minimum-weight perfect matching.
//!
//! Endpoint `p` names one end of edge `p / 2`; `p ^ 1` is the other end.
//! Indices `0..n` are vertices, `n..2n` are blossoms.

use std::mem;

const FREE: u8 = 0;
const OUTER: u8 = 1;
const INNER: u8 = 2;
const VISITED: u8 = 4;

#[derive(Clone, Copy, Debug)]
struct MatchEdge {
    a: usize,
    b: usize,
    weight: f64,
}

/// Dual adjustment chosen at the end of a search pass.
#[derive(Clone, Copy, Debug)]
enum DualStep {
    Finished,
    Grow(usize),
    Join(usize),
    Expand(usize),
}

struct BlossomMatcher {
    n: usize,
    edges: Vec<MatchEdge>,
    /// Remote endpoints of the edges incident to each vertex.
    incident: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge at each vertex.
    mate: Vec<Option<usize>>,
    label: Vec<u8>,
    /// Endpoint through which each vertex or blossom got its label.
    label_end: Vec<Option<usize>>,
    in_blossom: Vec<usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    base: Vec<Option<usize>>,
    /// Endpoints joining consecutive children, parallel to `children`.
    links: Vec<Vec<usize>>,
    best_edge: Vec<Option<usize>>,
    best_edges: Vec<Option<Vec<usize>>>,
    unused: Vec<usize>,
    dual: Vec<f64>,
    allowed: Vec<bool>,
    queue: Vec<usize>,
}

/// Pairs `0..n` (n even) so the summed `weights` are minimal. Pairs come back
/// with the smaller index first, sorted.
pub(super) fn min_weight_perfect_matching(
    n: usize,
    weight: impl Fn(usize, usize) -> f64,
) -> Vec<(usize, usize)> {
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for a in 0..n {
        for b in (a + 1)..n {
            edges.push(MatchEdge {
                a,
                b,
                weight: weight(a, b),
            });
        }
    }
    let offset = 1.0 + edges.iter().map(|e| e.weight).fold(0.0, f64::max);
    for edge in &mut edges {
        edge.weight = offset - edge.weight;
    }
    let mut pairs = BlossomMatcher::new(n, edges).solve();
    pairs.sort_unstable();
    pairs
}

impl BlossomMatcher {
    fn new(n: usize, edges: Vec<MatchEdge>) -> Self {
        let mut incident = vec![Vec::new(); n];
        for (k, edge) in edges.iter().enumerate() {
            incident[edge.a].push(2 * k + 1);
            incident[edge.b].push(2 * k);
        }
        let top = edges.iter().map(|e| e.weight).fold(0.0, f64::max);
        let mut dual = vec![top; n];
        dual.resize(2 * n, 0.0);
        let mut base: Vec<Option<usize>> = (0..n).map(Some).collect();
        base.resize(2 * n, None);
        let allowed = vec![false; edges.len()];
        Self {
            n,
            edges,
            incident,
            mate: vec![None; n],
            label: vec![FREE; 2 * n],
            label_end: vec![None; 2 * n],
            in_blossom: (0..n).collect(),
            parent: vec![None; 2 * n],
            children: vec![Vec::new(); 2 * n],
            base,
            links: vec![Vec::new(); 2 * n],
            best_edge: vec![None; 2 * n],
            best_edges: vec![None; 2 * n],
            unused: (n..2 * n).collect(),
            dual,
            allowed,
            queue: Vec::new(),
        }
    }

    fn endpoint(&self, p: usize) -> usize {
        let edge = self.edges[p / 2];
        if p % 2 == 0 { edge.a } else { edge.b }
    }

    fn slack(&self, k: usize) -> f64 {
        let edge = self.edges[k];
        self.dual[edge.a] + self.dual[edge.b] - 2.0 * edge.weight
    }

    fn tighter(&self, k: usize, current: Option<usize>) -> bool {
        current.is_none_or(|c| self.slack(k) < self.slack(c))
    }

    /// Vertices contained in `b`, in child order.
    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                out.push(t);
            } else {
                stack.extend(self.children[t].iter().rev());
            }
        }
        out
    }

    fn assign_label(&mut self, w: usize, label: u8, through: Option<usize>) {
        let b = self.in_blossom[w];
        self.label[w] = label;
        self.label[b] = label;
        self.label_end[w] = through;
        self.label_end[b] = through;
        self.best_edge[w] = None;
        self.best_edge[b] = None;
        if label == OUTER {
            let leaves = self.leaves(b);
            self.queue.extend(leaves);
        } else if let Some(m) = self.base[b].and_then(|base| self.mate[base]) {
            let next = self.endpoint(m);
            self.assign_label(next, OUTER, Some(m ^ 1));
        }
    }

    /// Walks up from `v` and `w` towards their roots. Returns the base of a
    /// new blossom, or `None` when the roots differ and the path augments.
    fn scan_blossom(&mut self, v: usize, w: usize) -> Option<usize> {
        let mut path = Vec::new();
        let mut found = None;
        let (mut v, mut w) = (Some(v), Some(w));
        while let Some(current) = v {
            let b = self.in_blossom[current];
            if self.label[b] & VISITED != 0 {
                found = self.base[b];
                break;
            }
            path.push(b);
            self.label[b] = OUTER | VISITED;
            v = self.label_end[b].and_then(|p| {
                let t = self.in_blossom[self.endpoint(p)];
                self.label_end[t].map(|q| self.endpoint(q))
            });
            if w.is_some() {
                mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = OUTER;
        }
        found
    }

    fn add_blossom(&mut self, base: usize, k: usize) {
        let Some(b) = self.unused.pop() else {
            return;
        };
        let edge = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[edge.a];
        let mut bw = self.in_blossom[edge.b];
        self.base[b] = Some(base);
        self.parent[b] = None;
        self.parent[bb] = Some(b);

        let mut path = Vec::new();
        let mut links = Vec::new();
        while bv != bb {
            self.parent[bv] = Some(b);
            path.push(bv);
            let Some(p) = self.label_end[bv] else { break };
            links.push(p);
            bv = self.in_blossom[self.endpoint(p)];
        }
        path.push(bb);
        path.reverse();
        links.reverse();
        links.push(2 * k);
        while bw != bb {
            self.parent[bw] = Some(b);
            path.push(bw);
            let Some(p) = self.label_end[bw] else { break };
            links.push(p ^ 1);
            bw = self.in_blossom[self.endpoint(p)];
        }
        self.children[b] = path.clone();
        self.links[b] = links;
        self.label[b] = OUTER;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0.0;
        for leaf in self.leaves(b) {
            if self.label[self.in_blossom[leaf]] == INNER {
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = b;
        }

        let mut best_to: Vec<Option<usize>> = vec![None; 2 * self.n];
        for &child in &path {
            let candidates: Vec<usize> = match self.best_edges[child].take() {
                Some(list) => list,
                None => self
                    .leaves(child)
                    .into_iter()
                    .flat_map(|leaf| self.incident[leaf].iter().map(|p| p / 2))
                    .collect(),
            };
            for k in candidates {
                let edge = self.edges[k];
                let far = if self.in_blossom[edge.b] == b {
                    edge.a
                } else {
                    edge.b
                };
                let bj = self.in_blossom[far];
                if bj != b && self.label[bj] == OUTER && self.tighter(k, best_to[bj]) {
                    best_to[bj] = Some(k);
                }
            }
            self.best_edge[child] = None;
        }
        let list: Vec<usize> = best_to.into_iter().flatten().collect();
        self.best_edge[b] = list
            .iter()
            .copied()
            .min_by(|&x, &y| self.slack(x).total_cmp(&self.slack(y)));
        self.best_edges[b] = Some(list);
    }

    #[expect(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        reason = "blossom child counts are far below isize::MAX"
    )]
    fn expand_blossom(&mut self, b: usize, end_of_stage: bool) {
        let children = self.children[b].clone();
        for &s in &children {
            self.parent[s] = None;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_of_stage && self.dual[s] == 0.0 {
                self.expand_blossom(s, end_of_stage);
            } else {
                for leaf in self.leaves(s) {
                    self.in_blossom[leaf] = s;
                }
            }
        }

        if !end_of_stage && self.label[b] == INNER {
            if let Some(through) = self.label_end[b] {
                let len = children.len() as isize;
                let at = |j: isize| j.rem_euclid(len) as usize;
                let entry = self.in_blossom[self.endpoint(through ^ 1)];
                let position = children.iter().position(|&c| c == entry).unwrap_or(0);
                let mut j = position as isize;
                let (step, trick) = if j & 1 == 1 {
                    j -= len;
                    (1, 0)
                } else {
                    (-1, 1)
                };
                let links = self.links[b].clone();
                let mut p = through;
                while j != 0 {
                    let vertex = self.endpoint(p ^ 1);
                    self.label[vertex] = FREE;
                    let link = links[at(j - trick as isize)];
                    let partner = self.endpoint(link ^ trick ^ 1);
                    self.label[partner] = FREE;
                    self.assign_label(vertex, INNER, Some(p));
                    self.allowed[link / 2] = true;
                    j += step;
                    p = links[at(j - trick as isize)] ^ trick;
                    self.allowed[p / 2] = true;
                    j += step;
                }
                let bv = children[at(j)];
                let vertex = self.endpoint(p ^ 1);
                self.label[vertex] = INNER;
                self.label[bv] = INNER;
                self.label_end[vertex] = Some(p);
                self.label_end[bv] = Some(p);
                self.best_edge[bv] = None;
                j += step;
                while children[at(j)] != entry {
                    let bv = children[at(j)];
                    j += step;
                    if self.label[bv] == OUTER {
                        continue;
                    }
                    let labelled = self
                        .leaves(bv)
                        .into_iter()
                        .find(|&v| self.label[v] != FREE);
                    if let Some(v) = labelled {
                        self.label[v] = FREE;
                        if let Some(m) = self.base[bv].and_then(|base| self.mate[base]) {
                            let partner = self.endpoint(m);
                            self.label[partner] = FREE;
                        }
                        let through = self.label_end[v];
                        self.assign_label(v, INNER, through);
                    }
                }
            }
        }

        self.label[b] = FREE;
        self.label_end[b] = None;
        self.children[b].clear();
        self.links[b].clear();
        self.base[b] = None;
        self.best_edges[b] = None;
        self.best_edge[b] = None;
        self.unused.push(b);
    }

    /// Rotates blossom `b` so that `v` becomes its base, flipping the
    /// matched edges along the way.
    #[expect(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        reason = "blossom child counts are far below isize::MAX"
    )]
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.parent[t] != Some(b) {
            match self.parent[t] {
                Some(up) => t = up,
                None => return,
            }
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }
        let children = self.children[b].clone();
        let len = children.len() as isize;
        let at = |j: isize| j.rem_euclid(len) as usize;
        let first = children.iter().position(|&c| c == t).unwrap_or(0);
        let mut j = first as isize;
        let (step, trick) = if first & 1 == 1 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };
        while j != 0 {
            j += step;
            let child = children[at(j)];
            let p = self.links[b][at(j - trick as isize)] ^ trick;
            if child >= self.n {
                let inner = self.endpoint(p);
                self.augment_blossom(child, inner);
            }
            j += step;
            let child = children[at(j)];
            if child >= self.n {
                let inner = self.endpoint(p ^ 1);
                self.augment_blossom(child, inner);
            }
            let (near, far) = (self.endpoint(p), self.endpoint(p ^ 1));
            self.mate[near] = Some(p ^ 1);
            self.mate[far] = Some(p);
        }
        self.children[b].rotate_left(first);
        self.links[b].rotate_left(first);
        self.base[b] = self.base[self.children[b][0]];
    }

    fn augment_matching(&mut self, k: usize) {
        let edge = self.edges[k];
        for (start, end) in [(edge.a, 2 * k + 1), (edge.b, 2 * k)] {
            let (mut s, mut p) = (start, end);
            loop {
                let bs = self.in_blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = Some(p);
                let Some(up) = self.label_end[bs] else { break };
                let bt = self.in_blossom[self.endpoint(up)];
                let Some(down) = self.label_end[bt] else { break };
                s = self.endpoint(down);
                let j = self.endpoint(down ^ 1);
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = Some(down);
                p = down ^ 1;
            }
        }
    }

    /// Grows alternating trees from the queue; returns `true` once an
    /// augmenting path was applied.
    fn search(&mut self) -> bool {
        while let Some(v) = self.queue.pop() {
            for index in 0..self.incident[v].len() {
                let p = self.incident[v][index];
                let k = p / 2;
                let w = self.endpoint(p);
                if self.in_blossom[v] == self.in_blossom[w] {
                    continue;
                }
                let mut slack = 0.0;
                if !self.allowed[k] {
                    slack = self.slack(k);
                    if slack <= 0.0 {
                        self.allowed[k] = true;
                    }
                }
                let bw = self.in_blossom[w];
                if self.allowed[k] {
                    if self.label[bw] == FREE {
                        self.assign_label(w, INNER, Some(p ^ 1));
                    } else if self.label[bw] == OUTER {
                        match self.scan_blossom(v, w) {
                            Some(base) => self.add_blossom(base, k),
                            None => {
                                self.augment_matching(k);
                                return true;
                            }
                        }
                    } else if self.label[w] == FREE {
                        self.label[w] = INNER;
                        self.label_end[w] = Some(p ^ 1);
                    }
                } else if self.label[bw] == OUTER {
                    let bv = self.in_blossom[v];
                    if self.best_edge[bv].is_none_or(|e| slack < self.slack(e)) {
                        self.best_edge[bv] = Some(k);
                    }
                } else if self.label[w] == FREE
                    && self.best_edge[w].is_none_or(|e| slack < self.slack(e))
                {
                    self.best_edge[w] = Some(k);
                }
            }
        }
        false
    }

    fn choose_dual_step(&self) -> (f64, DualStep) {
        let n = self.n;
        let mut best: Option<(f64, DualStep)> = None;
        let mut offer = |delta: f64, step: DualStep| {
            if best.is_none_or(|(current, _)| delta < current) {
                best = Some((delta, step));
            }
        };
        for v in 0..n {
            if self.label[self.in_blossom[v]] == FREE {
                if let Some(k) = self.best_edge[v] {
                    offer(self.slack(k), DualStep::Grow(k));
                }
            }
        }
        for b in 0..2 * n {
            if self.parent[b].is_none() && self.label[b] == OUTER {
                if let Some(k) = self.best_edge[b] {
                    offer(self.slack(k) / 2.0, DualStep::Join(k));
                }
            }
        }
        for b in n..2 * n {
            if self.base[b].is_some() && self.parent[b].is_none() && self.label[b] == INNER {
                offer(self.dual[b], DualStep::Expand(b));
            }
        }
        best.unwrap_or_else(|| {
            let floor = self.dual[..n].iter().copied().fold(f64::INFINITY, f64::min);
            (floor.max(0.0), DualStep::Finished)
        })
    }

    fn apply_dual_step(&mut self, delta: f64) {
        let n = self.n;
        for v in 0..n {
            match self.label[self.in_blossom[v]] {
                OUTER => self.dual[v] -= delta,
                INNER => self.dual[v] += delta,
                _ => {}
            }
        }
        for b in n..2 * n {
            if self.base[b].is_some() && self.parent[b].is_none() {
                match self.label[b] {
                    OUTER => self.dual[b] += delta,
                    INNER => self.dual[b] -= delta,
                    _ => {}
                }
            }
        }
    }

    fn solve(mut self) -> Vec<(usize, usize)> {
        let n = self.n;
        for _ in 0..n {
            self.label.fill(FREE);
            self.best_edge.fill(None);
            for list in &mut self.best_edges[n..] {
                *list = None;
            }
            self.allowed.fill(false);
            self.queue.clear();
            for v in 0..n {
                if self.mate[v].is_none() && self.label[self.in_blossom[v]] == FREE {
                    self.assign_label(v, OUTER, None);
                }
            }

            let augmented = loop {
                if self.search() {
                    break true;
                }
                let (delta, step) = self.choose_dual_step();
                self.apply_dual_step(delta);
                match step {
                    DualStep::Finished => break false,
                    DualStep::Grow(k) => {
                        self.allowed[k] = true;
                        let edge = self.edges[k];
                        let outer = if self.label[self.in_blossom[edge.a]] == FREE {
                            edge.b
                        } else {
                            edge.a
                        };
                        self.queue.push(outer);
                    }
                    DualStep::Join(k) => {
                        self.allowed[k] = true;
                        self.queue.push(self.edges[k].a);
                    }
                    DualStep::Expand(b) => self.expand_blossom(b, false),
                }
            };
            if !augmented {
                break;
            }
            for b in n..2 * n {
                if self.parent[b].is_none()
                    && self.base[b].is_some()
                    && self.label[b] == OUTER
                    && self.dual[b] == 0.0
                {
                    self.expand_blossom(b, true);
                }
            }
        }

        (0..n)
            .filter_map(|v| {
                let w = self.endpoint(self.mate[v]?);
                (v < w).then_some((v, w))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::min_weight_perfect_matching;

    fn cost(weights: &[Vec<f64>], pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(a, b)| weights[a][b]).sum()
    }

    #[rstest]
    #[case::empty(0)]
    #[case::pair(2)]
    fn trivial_sizes(#[case] n: usize) {
        let pairs = min_weight_perfect_matching(n, |_, _| 1.0);
        assert_eq!(pairs.len(), n / 2);
    }

    #[rstest]
    fn avoids_the_greedy_trap() {
        // Points on a line at 0, 2, 3, 5: pairing the middle first costs 6.
        let x = [0.0_f64, 2.0, 3.0, 5.0];
        let pairs = min_weight_perfect_matching(4, |a, b| (x[a] - x[b]).abs());
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
    }

    #[rstest]
    fn needs_a_blossom_to_beat_the_triangle() {
        // Two cheap triangles joined by one cheap bridge; the odd cycles force
        // blossom contraction before the bridge is matched.
        let mut weights = vec![vec![10.0; 6]; 6];
        for &(a, b, w) in &[
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 2, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
            (3, 5, 1.0),
            (2, 3, 2.0),
        ] {
            weights[a][b] = w;
            weights[b][a] = w;
        }
        let pairs = min_weight_perfect_matching(6, |a, b| weights[a][b]);
        assert_eq!(pairs.len(), 3);
        assert!((cost(&weights, &pairs) - 4.0).abs() < 1e-12);
        assert!(pairs.contains(&(2, 3)));
    }
}
