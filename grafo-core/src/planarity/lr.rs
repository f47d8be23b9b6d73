//! Left-right planarity test with rotation-system construction.
//!
//! Works on a simple undirected graph given as neighbour lists. Three
//! depth-first passes run over explicit stacks: orientation (heights,
//! lowpoints, nesting depths), testing (conflict pairs of return-edge
//! intervals) and embedding (placing each back edge on its resolved side).

use std::collections::{HashMap, HashSet};

/// Interval of return edges, delimited by its lowest and highest edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Interval {
    low: Option<usize>,
    high: Option<usize>,
}

impl Interval {
    const fn single(edge: usize) -> Self {
        Self {
            low: Some(edge),
            high: Some(edge),
        }
    }

    const fn is_empty(self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ConflictPair {
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    const fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

/// Cyclic neighbour order around every vertex.
#[derive(Clone, Debug)]
pub(super) struct Rotation {
    /// `links[v][w] = (clockwise, counter-clockwise)` neighbours of `w`
    /// around `v`.
    links: Vec<HashMap<usize, (usize, usize)>>,
    first: Vec<Option<usize>>,
}

impl Rotation {
    fn new(n: usize) -> Self {
        Self {
            links: vec![HashMap::new(); n],
            first: vec![None; n],
        }
    }

    /// Inserts `end` clockwise after `reference` around `start`, or as the
    /// only neighbour when there is no reference.
    fn add_cw(&mut self, start: usize, end: usize, reference: Option<usize>) {
        let around = &mut self.links[start];
        let Some(reference) = reference else {
            around.insert(end, (end, end));
            self.first[start] = Some(end);
            return;
        };
        let Some(&(after, _)) = around.get(&reference) else {
            return;
        };
        around.insert(end, (after, reference));
        if let Some(link) = around.get_mut(&reference) {
            link.0 = end;
        }
        if let Some(link) = around.get_mut(&after) {
            link.1 = end;
        }
    }

    /// Inserts `end` counter-clockwise before `reference` around `start`.
    fn add_ccw(&mut self, start: usize, end: usize, reference: Option<usize>) {
        let Some(reference) = reference else {
            self.add_cw(start, end, None);
            return;
        };
        let Some(&(_, before)) = self.links[start].get(&reference) else {
            return;
        };
        self.add_cw(start, end, Some(before));
        if self.first[start] == Some(reference) {
            self.first[start] = Some(end);
        }
    }

    fn add_first(&mut self, start: usize, end: usize) {
        let reference = self.first[start];
        self.add_ccw(start, end, reference);
    }

    /// Neighbours of `v` in clockwise order from its first neighbour.
    pub(super) fn clockwise(&self, v: usize) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.links[v].len());
        let Some(first) = self.first[v] else {
            return order;
        };
        let mut current = first;
        loop {
            order.push(current);
            match self.links[v].get(&current) {
                Some(&(next, _)) if next != first && order.len() < self.links[v].len() => {
                    current = next;
                }
                _ => return order,
            }
        }
    }

    /// Neighbour preceding `w` counter-clockwise around `v`.
    pub(super) fn counter_clockwise(&self, v: usize, w: usize) -> Option<usize> {
        self.links.get(v)?.get(&w).map(|&(_, ccw)| ccw)
    }

    pub(super) fn len(&self) -> usize {
        self.links.len()
    }
}

struct LeftRight<'a> {
    adjacency: &'a [Vec<usize>],
    height: Vec<Option<usize>>,
    parent_edge: Vec<Option<usize>>,
    cursor: Vec<usize>,
    resume: Vec<Option<usize>>,
    oriented: HashSet<(usize, usize)>,
    roots: Vec<usize>,
    /// Oriented edges leaving each vertex.
    outgoing: Vec<Vec<usize>>,
    tails: Vec<usize>,
    heads: Vec<usize>,
    lowpt: Vec<usize>,
    lowpt2: Vec<usize>,
    nesting: Vec<i64>,
    reference: Vec<Option<usize>>,
    side: Vec<i64>,
    lowpt_edge: Vec<Option<usize>>,
    stack_bottom: Vec<usize>,
    entered: Vec<bool>,
    conflicts: Vec<ConflictPair>,
    left_ref: Vec<Option<usize>>,
    right_ref: Vec<Option<usize>>,
}

impl<'a> LeftRight<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            height: vec![None; n],
            parent_edge: vec![None; n],
            cursor: vec![0; n],
            resume: vec![None; n],
            oriented: HashSet::new(),
            roots: Vec::new(),
            outgoing: vec![Vec::new(); n],
            tails: Vec::new(),
            heads: Vec::new(),
            lowpt: Vec::new(),
            lowpt2: Vec::new(),
            nesting: Vec::new(),
            reference: Vec::new(),
            side: Vec::new(),
            lowpt_edge: Vec::new(),
            stack_bottom: Vec::new(),
            entered: Vec::new(),
            conflicts: Vec::new(),
            left_ref: vec![None; n],
            right_ref: vec![None; n],
        }
    }

    fn height_of(&self, v: usize) -> usize {
        self.height[v].unwrap_or(0)
    }

    fn orient_edge(&mut self, v: usize, w: usize) -> usize {
        let edge = self.tails.len();
        let height = self.height_of(v);
        self.tails.push(v);
        self.heads.push(w);
        self.lowpt.push(height);
        self.lowpt2.push(height);
        self.nesting.push(0);
        self.reference.push(None);
        self.side.push(1);
        self.lowpt_edge.push(None);
        self.stack_bottom.push(0);
        self.entered.push(false);
        self.outgoing[v].push(edge);
        edge
    }

    fn orient(&mut self, root: usize) {
        let mut stack = vec![root];
        'vertices: while let Some(v) = stack.pop() {
            let height = self.height_of(v);
            let parent = self.parent_edge[v];
            while let Some(&w) = self.adjacency[v].get(self.cursor[v]) {
                let edge = if let Some(edge) = self.resume[v].take() {
                    edge
                } else {
                    if !self.oriented.insert((v.min(w), v.max(w))) {
                        self.cursor[v] += 1;
                        continue;
                    }
                    let edge = self.orient_edge(v, w);
                    if let Some(target_height) = self.height[w] {
                        self.lowpt[edge] = target_height;
                    } else {
                        self.parent_edge[w] = Some(edge);
                        self.height[w] = Some(height + 1);
                        self.resume[v] = Some(edge);
                        stack.push(v);
                        stack.push(w);
                        continue 'vertices;
                    }
                    edge
                };
                let chordal = i64::from(self.lowpt2[edge] < height);
                self.nesting[edge] = 2 * to_i64(self.lowpt[edge]) + chordal;
                if let Some(parent) = parent {
                    self.raise_lowpoints(parent, edge);
                }
                self.cursor[v] += 1;
            }
        }
    }

    fn raise_lowpoints(&mut self, parent: usize, edge: usize) {
        use std::cmp::Ordering;
        match self.lowpt[edge].cmp(&self.lowpt[parent]) {
            Ordering::Less => {
                self.lowpt2[parent] = self.lowpt[parent].min(self.lowpt2[edge]);
                self.lowpt[parent] = self.lowpt[edge];
            }
            Ordering::Greater => {
                self.lowpt2[parent] = self.lowpt2[parent].min(self.lowpt[edge]);
            }
            Ordering::Equal => {
                self.lowpt2[parent] = self.lowpt2[parent].min(self.lowpt2[edge]);
            }
        }
    }

    fn conflicting(&self, interval: Interval, edge: usize) -> bool {
        !interval.is_empty()
            && interval
                .high
                .is_some_and(|high| self.lowpt[high] > self.lowpt[edge])
    }

    fn lowest(&self, pair: &ConflictPair) -> usize {
        match (pair.left.low, pair.right.low) {
            (Some(left), Some(right)) => self.lowpt[left].min(self.lowpt[right]),
            (Some(low), None) | (None, Some(low)) => self.lowpt[low],
            (None, None) => usize::MAX,
        }
    }

    fn test(&mut self, root: usize) -> bool {
        let mut stack = vec![root];
        'vertices: while let Some(v) = stack.pop() {
            let height = self.height_of(v);
            let parent = self.parent_edge[v];
            while let Some(&edge) = self.outgoing[v].get(self.cursor[v]) {
                let w = self.heads[edge];
                if !self.entered[edge] {
                    self.stack_bottom[edge] = self.conflicts.len();
                    if self.parent_edge[w] == Some(edge) {
                        self.entered[edge] = true;
                        stack.push(v);
                        stack.push(w);
                        continue 'vertices;
                    }
                    self.lowpt_edge[edge] = Some(edge);
                    self.conflicts.push(ConflictPair {
                        left: Interval::default(),
                        right: Interval::single(edge),
                    });
                }
                if self.lowpt[edge] < height {
                    if let Some(parent) = parent {
                        if self.cursor[v] == 0 {
                            self.lowpt_edge[parent] = self.lowpt_edge[edge];
                        } else if !self.add_constraints(edge, parent) {
                            return false;
                        }
                    }
                }
                self.cursor[v] += 1;
            }
            if let Some(parent) = parent {
                self.remove_back_edges(parent);
            }
        }
        true
    }

    fn add_constraints(&mut self, edge: usize, parent: usize) -> bool {
        let mut merged = ConflictPair::default();
        loop {
            let Some(mut pair) = self.conflicts.pop() else {
                break;
            };
            if !pair.left.is_empty() {
                pair.swap();
            }
            if !pair.left.is_empty() {
                return false;
            }
            if pair
                .right
                .low
                .is_some_and(|low| self.lowpt[low] > self.lowpt[parent])
            {
                if merged.right.is_empty() {
                    merged.right = pair.right;
                } else if let Some(low) = merged.right.low {
                    self.reference[low] = pair.right.high;
                }
                merged.right.low = pair.right.low;
            } else if let Some(low) = pair.right.low {
                self.reference[low] = self.lowpt_edge[parent];
            }
            if self.conflicts.len() <= self.stack_bottom[edge] {
                break;
            }
        }
        while let Some(&top) = self.conflicts.last() {
            if !(self.conflicting(top.left, edge) || self.conflicting(top.right, edge)) {
                break;
            }
            let mut pair = top;
            self.conflicts.pop();
            if self.conflicting(pair.right, edge) {
                pair.swap();
            }
            if self.conflicting(pair.right, edge) {
                return false;
            }
            if let Some(low) = merged.right.low {
                self.reference[low] = pair.right.high;
            }
            if pair.right.low.is_some() {
                merged.right.low = pair.right.low;
            }
            if merged.left.is_empty() {
                merged.left = pair.left;
            } else if let Some(low) = merged.left.low {
                self.reference[low] = pair.left.high;
            }
            merged.left.low = pair.left.low;
        }
        if !(merged.left.is_empty() && merged.right.is_empty()) {
            self.conflicts.push(merged);
        }
        true
    }

    fn remove_back_edges(&mut self, edge: usize) {
        let u = self.tails[edge];
        let height = self.height_of(u);
        while self
            .conflicts
            .last()
            .is_some_and(|top| self.lowest(top) == height)
        {
            if let Some(low) = self.conflicts.pop().and_then(|pair| pair.left.low) {
                self.side[low] = -1;
            }
        }
        if let Some(mut pair) = self.conflicts.pop() {
            while let Some(high) = pair.left.high.filter(|&high| self.heads[high] == u) {
                pair.left.high = self.reference[high];
            }
            if pair.left.high.is_none() {
                if let Some(low) = pair.left.low.take() {
                    self.reference[low] = pair.right.low;
                    self.side[low] = -1;
                }
            }
            while let Some(high) = pair.right.high.filter(|&high| self.heads[high] == u) {
                pair.right.high = self.reference[high];
            }
            if pair.right.high.is_none() {
                if let Some(low) = pair.right.low.take() {
                    self.reference[low] = pair.left.low;
                    self.side[low] = -1;
                }
            }
            self.conflicts.push(pair);
        }
        if self.lowpt[edge] < height {
            let (left, right) = self
                .conflicts
                .last()
                .map_or((None, None), |top| (top.left.high, top.right.high));
            self.reference[edge] = match (left, right) {
                (Some(left), None) => Some(left),
                (Some(left), Some(right)) if self.lowpt[left] > self.lowpt[right] => Some(left),
                _ => right,
            };
        }
    }

    /// Resolves the side of `edge` through its chain of references.
    fn sign(&mut self, edge: usize) -> i64 {
        let mut stack = vec![edge];
        let mut followed: HashMap<usize, usize> = HashMap::new();
        while let Some(current) = stack.pop() {
            if let Some(next) = self.reference[current].take() {
                followed.insert(current, next);
                stack.push(current);
                stack.push(next);
            } else if let Some(&next) = followed.get(&current) {
                self.side[current] *= self.side[next];
            }
        }
        self.side[edge]
    }

    fn embed(&mut self, root: usize, rotation: &mut Rotation) {
        let mut stack = vec![root];
        'vertices: while let Some(v) = stack.pop() {
            while let Some(&edge) = self.outgoing[v].get(self.cursor[v]) {
                self.cursor[v] += 1;
                let w = self.heads[edge];
                if self.parent_edge[w] == Some(edge) {
                    rotation.add_first(w, v);
                    self.left_ref[v] = Some(w);
                    self.right_ref[v] = Some(w);
                    stack.push(v);
                    stack.push(w);
                    continue 'vertices;
                }
                if self.side[edge] == 1 {
                    rotation.add_cw(w, v, self.right_ref[w]);
                } else {
                    rotation.add_ccw(w, v, self.left_ref[w]);
                    self.left_ref[w] = Some(v);
                }
            }
        }
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX / 4)
}

/// Tests planarity of the simple graph with the given neighbour lists and,
/// when planar, returns a combinatorial embedding.
pub(super) fn planar_rotation(adjacency: &[Vec<usize>]) -> Option<Rotation> {
    let n = adjacency.len();
    let edges = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
    if n > 2 && edges > 3 * n - 6 {
        return None;
    }
    let mut state = LeftRight::new(adjacency);
    for root in 0..n {
        if state.height[root].is_none() {
            state.height[root] = Some(0);
            state.roots.push(root);
            state.orient(root);
        }
    }

    for v in 0..n {
        let mut ordered = std::mem::take(&mut state.outgoing[v]);
        ordered.sort_by_key(|&edge| state.nesting[edge]);
        state.outgoing[v] = ordered;
    }
    state.cursor.fill(0);
    let roots = state.roots.clone();
    for &root in &roots {
        if !state.test(root) {
            return None;
        }
    }

    for edge in 0..state.tails.len() {
        let sign = state.sign(edge);
        state.nesting[edge] *= sign;
    }
    let mut rotation = Rotation::new(n);
    for v in 0..n {
        let mut ordered = std::mem::take(&mut state.outgoing[v]);
        ordered.sort_by_key(|&edge| state.nesting[edge]);
        let mut previous = None;
        for &edge in &ordered {
            let w = state.heads[edge];
            rotation.add_cw(v, w, previous);
            previous = Some(w);
        }
        state.outgoing[v] = ordered;
    }
    state.cursor.fill(0);
    for &root in &roots {
        state.embed(root, &mut rotation);
    }
    Some(rotation)
}

/// Neighbour lists of the simple graph on `n` vertices with `edges`.
pub(super) fn adjacency_of(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); n];
    for &(a, b) in edges {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    adjacency
}

/// Returns `true` when the simple graph on `n` vertices with `edges` is
/// planar.
pub(super) fn is_planar_edges(n: usize, edges: &[(usize, usize)]) -> bool {
    planar_rotation(&adjacency_of(n, edges)).is_some()
}
