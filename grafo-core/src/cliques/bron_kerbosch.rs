//! Bron-Kerbosch enumeration with Tomita pivoting over an explicit stack.

use crate::{budget::BudgetMeter, error::Result};

fn adjacent(adjacency: &[Vec<usize>], a: usize, b: usize) -> bool {
    adjacency[a].binary_search(&b).is_ok()
}

fn neighbours_within(adjacency: &[Vec<usize>], v: usize, set: &[usize]) -> Vec<usize> {
    set.iter()
        .copied()
        .filter(|&w| adjacent(adjacency, v, w))
        .collect()
}

/// One recursion level: the clique so far, the candidate and excluded sets
/// (sorted), and the branch vertices left to try.
struct Frame {
    clique: Vec<usize>,
    candidates: Vec<usize>,
    excluded: Vec<usize>,
    branches: Vec<usize>,
    next: usize,
}

impl Frame {
    fn new(adjacency: &[Vec<usize>], clique: Vec<usize>, candidates: Vec<usize>, excluded: Vec<usize>) -> Self {
        let branches = Self::branches(adjacency, &candidates, &excluded);
        Self {
            clique,
            candidates,
            excluded,
            branches,
            next: 0,
        }
    }

    /// Candidates outside the neighbourhood of the Tomita pivot: the vertex of
    /// `P ∪ X` with the most neighbours in `P`, lowest index first.
    fn branches(adjacency: &[Vec<usize>], candidates: &[usize], excluded: &[usize]) -> Vec<usize> {
        let pivot = candidates
            .iter()
            .chain(excluded)
            .copied()
            .map(|u| (neighbours_within(adjacency, u, candidates).len(), u))
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
            .map(|(_, u)| u);
        candidates
            .iter()
            .copied()
            .filter(|&v| pivot.is_none_or(|u| !adjacent(adjacency, u, v)))
            .collect()
    }
}

/// Every maximal clique of the simple graph `adjacency` (sorted neighbour
/// lists), each as ascending vertex indices. Every branch ticks the meter.
pub(super) fn enumerate(adjacency: &[Vec<usize>], meter: &mut BudgetMeter) -> Result<Vec<Vec<usize>>> {
    let mut cliques = Vec::new();
    if adjacency.is_empty() {
        return Ok(cliques);
    }
    let everything: Vec<usize> = (0..adjacency.len()).collect();
    let mut stack = vec![Frame::new(adjacency, Vec::new(), everything, Vec::new())];
    while let Some(frame) = stack.last_mut() {
        let Some(&v) = frame.branches.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        meter.tick()?;

        let mut clique = frame.clique.clone();
        clique.push(v);
        let candidates = neighbours_within(adjacency, v, &frame.candidates);
        let excluded = neighbours_within(adjacency, v, &frame.excluded);
        if let Ok(position) = frame.candidates.binary_search(&v) {
            frame.candidates.remove(position);
        }
        if let Err(position) = frame.excluded.binary_search(&v) {
            frame.excluded.insert(position, v);
        }

        if candidates.is_empty() {
            if excluded.is_empty() {
                clique.sort_unstable();
                cliques.push(clique);
            }
        } else {
            stack.push(Frame::new(adjacency, clique, candidates, excluded));
        }
    }
    Ok(cliques)
}
