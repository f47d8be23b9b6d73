//! Ullmann's refinement search over an explicit frame stack.

use tracing::debug;

use crate::{budget::BudgetMeter, error::Result, graph::IndexedGraph};

/// Dense adjacency with distinct in/out neighbour lists.
pub(super) struct Structure {
    n: usize,
    arcs: Vec<bool>,
    out: Vec<Vec<usize>>,
    inward: Vec<Vec<usize>>,
    looped: Vec<bool>,
}

impl Structure {
    pub(super) fn new(indexed: &IndexedGraph) -> Self {
        let n = indexed.len();
        let mut arcs = vec![false; n * n];
        let mut looped = vec![false; n];
        for &(s, t, _) in indexed.edges() {
            if s == t {
                looped[s] = true;
                continue;
            }
            arcs[s * n + t] = true;
            if !indexed.is_directed() {
                arcs[t * n + s] = true;
            }
        }
        let out = (0..n)
            .map(|v| (0..n).filter(|&w| arcs[v * n + w]).collect())
            .collect();
        let inward = (0..n)
            .map(|v| (0..n).filter(|&w| arcs[w * n + v]).collect())
            .collect();
        Self {
            n,
            arcs,
            out,
            inward,
            looped,
        }
    }

    fn has_arc(&self, from: usize, to: usize) -> bool {
        self.arcs[from * self.n + to]
    }
}

/// Candidate matrix: row per pattern vertex, column per target vertex.
#[derive(Clone)]
struct Candidates {
    columns: usize,
    cells: Vec<bool>,
}

impl Candidates {
    fn get(&self, row: usize, column: usize) -> bool {
        self.cells[row * self.columns + column]
    }

    fn clear(&mut self, row: usize, column: usize) {
        self.cells[row * self.columns + column] = false;
    }

    fn row_is_empty(&self, row: usize) -> bool {
        self.cells[row * self.columns..(row + 1) * self.columns]
            .iter()
            .all(|cell| !cell)
    }
}

struct Frame {
    depth: usize,
    cursor: usize,
    chosen: Option<usize>,
    candidates: Candidates,
}

/// Drives the search; `visit` receives each complete mapping (pattern
/// position to target position) and returns `false` to stop.
pub(super) struct Search<'a> {
    pattern: &'a Structure,
    target: &'a Structure,
    order: Vec<usize>,
    mapping: Vec<Option<usize>>,
    used: Vec<bool>,
}

impl<'a> Search<'a> {
    pub(super) fn new(pattern: &'a Structure, target: &'a Structure) -> Self {
        let mut order: Vec<usize> = (0..pattern.n).collect();
        order.sort_by_key(|&v| std::cmp::Reverse(pattern.out[v].len() + pattern.inward[v].len()));
        Self {
            pattern,
            target,
            order,
            mapping: vec![None; pattern.n],
            used: vec![false; target.n],
        }
    }

    fn compatible(&self, p: usize, t: usize) -> bool {
        let (pattern, target) = (self.pattern, self.target);
        pattern.out[p].len() <= target.out[t].len()
            && pattern.inward[p].len() <= target.inward[t].len()
            && (!pattern.looped[p] || target.looped[t])
    }

    fn initial(&self) -> Candidates {
        let columns = self.target.n;
        let cells = (0..self.pattern.n)
            .flat_map(|p| (0..columns).map(move |t| (p, t)))
            .map(|(p, t)| self.compatible(p, t))
            .collect();
        Candidates { columns, cells }
    }

    /// Drops `(p, t)` whenever a pattern neighbour of `p` has no candidate
    /// among the matching target neighbours of `t`, until nothing changes.
    /// Returns `false` if some row empties.
    fn refine(&self, candidates: &mut Candidates) -> bool {
        let (pattern, target) = (self.pattern, self.target);
        loop {
            let mut changed = false;
            for p in 0..pattern.n {
                for t in 0..target.n {
                    if !candidates.get(p, t) {
                        continue;
                    }
                    let supported = |mine: &[usize], theirs: &[usize]| {
                        mine.iter()
                            .all(|&x| theirs.iter().any(|&y| candidates.get(x, y)))
                    };
                    if !supported(&pattern.out[p], &target.out[t])
                        || !supported(&pattern.inward[p], &target.inward[t])
                    {
                        candidates.clear(p, t);
                        changed = true;
                    }
                }
                if candidates.row_is_empty(p) {
                    return false;
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Every arc between `p` and an already mapped pattern vertex must exist
    /// between their images.
    fn consistent(&self, p: usize, t: usize) -> bool {
        let pattern = self.pattern;
        pattern.out[p].iter().all(|&x| {
            self.mapping[x].is_none_or(|image| self.target.has_arc(t, image))
        }) && pattern.inward[p].iter().all(|&x| {
            self.mapping[x].is_none_or(|image| self.target.has_arc(image, t))
        })
    }

    fn release(&mut self, frame: &Frame) {
        if let Some(t) = frame.chosen {
            self.mapping[self.order[frame.depth]] = None;
            self.used[t] = false;
        }
    }

    pub(super) fn run<F>(&mut self, meter: &mut BudgetMeter, mut visit: F) -> Result<()>
    where
        F: FnMut(&[Option<usize>]) -> bool,
    {
        let mut root = self.initial();
        if !self.refine(&mut root) {
            return Ok(());
        }
        let mut stack = vec![Frame {
            depth: 0,
            cursor: 0,
            chosen: None,
            candidates: root,
        }];
        while let Some(mut frame) = stack.pop() {
            if frame.depth == self.pattern.n {
                if !visit(&self.mapping) {
                    debug!(explored = meter.explored(), "search stopped by caller");
                    return Ok(());
                }
                continue;
            }
            self.release(&frame);
            frame.chosen = None;
            let p = self.order[frame.depth];
            let next = (frame.cursor..self.target.n)
                .find(|&t| frame.candidates.get(p, t) && !self.used[t] && self.consistent(p, t));
            let Some(t) = next else {
                continue;
            };
            meter.tick()?;
            frame.cursor = t + 1;
            frame.chosen = Some(t);
            self.mapping[p] = Some(t);
            self.used[t] = true;

            let mut narrowed = frame.candidates.clone();
            for column in 0..self.target.n {
                if column != t {
                    narrowed.clear(p, column);
                }
            }
            for row in 0..self.pattern.n {
                if row != p {
                    narrowed.clear(row, t);
                }
            }
            let depth = frame.depth + 1;
            stack.push(frame);
            if self.refine(&mut narrowed) {
                stack.push(Frame {
                    depth,
                    cursor: 0,
                    chosen: None,
                    candidates: narrowed,
                });
            }
        }
        Ok(())
    }
}
