//! Backtracking search for Hamiltonian cycles.

use crate::{budget::BudgetMeter, error::Result, graph::IndexedGraph};

/// Sorted, deduplicated successors without self-loops. Undirected graphs use
/// the symmetric view.
fn successors(indexed: &IndexedGraph) -> Vec<Vec<usize>> {
    if !indexed.is_directed() {
        return indexed.simple_adjacency();
    }
    (0..indexed.len())
        .map(|v| {
            let mut next: Vec<usize> = indexed
                .outgoing(v)
                .iter()
                .map(|neighbor| neighbor.index)
                .filter(|&w| w != v)
                .collect();
            next.sort_unstable();
            next.dedup();
            next
        })
        .collect()
}

/// Depth-first extension of a path rooted at vertex 0. Every extension ticks
/// the meter. Returns the open vertex order of the first cycle found.
pub(super) fn search(indexed: &IndexedGraph, meter: &mut BudgetMeter) -> Result<Option<Vec<usize>>> {
    let n = indexed.len();
    let minimum = if indexed.is_directed() { 2 } else { 3 };
    if n < minimum {
        return Ok(None);
    }
    let next = successors(indexed);
    let closes = |v: usize| next[v].binary_search(&0).is_ok();

    let mut on_path = vec![false; n];
    on_path[0] = true;
    let mut path = vec![0_usize];
    let mut cursors = vec![0_usize];
    while let Some(&tail) = path.last() {
        if path.len() == n && closes(tail) {
            return Ok(Some(path));
        }
        let depth = path.len() - 1;
        let candidate = if path.len() == n {
            None
        } else {
            next[tail]
                .iter()
                .enumerate()
                .skip(cursors[depth])
                .find(|&(_, &w)| !on_path[w])
                .map(|(position, &w)| (position, w))
        };
        match candidate {
            Some((position, w)) => {
                meter.tick()?;
                cursors[depth] = position + 1;
                on_path[w] = true;
                path.push(w);
                cursors.push(0);
            }
            None => {
                path.pop();
                cursors.pop();
                on_path[tail] = false;
            }
        }
    }
    Ok(None)
}
