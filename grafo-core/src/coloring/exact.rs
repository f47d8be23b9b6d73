//! Exact k-colourability by budgeted backtracking.

use tracing::{debug, instrument};

use super::{Coloring, simple_snapshot};
use crate::{budget::SearchBudget, error::Result};

struct Frame {
    position: usize,
    next_color: usize,
}

/// Searches for a proper colouring with at most `k` colours.
///
/// Vertices are tried in descending degree order and colours are introduced
/// in increasing order, which removes permutation symmetry. Returns
/// `Ok(None)` when the search proves no such colouring exists.
///
/// # Errors
/// Returns [`crate::AlgorithmError::SelfLoop`] for graphs with a self-loop and
/// [`crate::AlgorithmError::SearchBudgetExceeded`] or
/// [`crate::AlgorithmError::DeadlineExceeded`] when `budget` runs out.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, SearchBudget, coloring::is_k_colorable};
///
/// let mut graph = Graph::undirected("c5");
/// for id in 0..5 {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// for id in 0..5 {
///     graph.add_edge(id, (id + 1) % 5, 1.0, Attributes::new())?;
/// }
/// assert!(is_k_colorable(&graph, 2, SearchBudget::default())?.is_none());
/// assert!(is_k_colorable(&graph, 3, SearchBudget::default())?.is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(name = "coloring.k_colorable", level = "debug", err, skip(graph, budget))]
pub fn is_k_colorable(graph: &crate::Graph, k: usize, budget: SearchBudget) -> Result<Option<Coloring>> {
    let indexed = simple_snapshot(graph, "k_colorable")?;
    let adjacency = indexed.simple_adjacency();
    let n = indexed.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        adjacency[b]
            .len()
            .cmp(&adjacency[a].len())
            .then_with(|| indexed.id(a).cmp(indexed.id(b)))
    });

    let mut meter = budget.start("k_colorable");
    let mut colors: Vec<Option<usize>> = vec![None; n];
    let mut stack = vec![Frame {
        position: 0,
        next_color: 0,
    }];
    while let Some(frame) = stack.last_mut() {
        if frame.position == n {
            debug!(explored = meter.explored(), "colouring found");
            let assignment: Vec<usize> = colors.iter().map(|c| c.unwrap_or_default()).collect();
            return Ok(Some(Coloring::from_indexed(&indexed, &assignment)));
        }
        meter.tick()?;
        let vertex = order[frame.position];
        let opened = order[..frame.position]
            .iter()
            .filter_map(|&v| colors[v])
            .max()
            .map_or(0, |max| max + 1);
        let limit = k.min(opened + 1);
        let candidate = (frame.next_color..limit).find(|&color| {
            adjacency[vertex]
                .iter()
                .all(|&neighbour| colors[neighbour] != Some(color))
        });
        match candidate {
            Some(color) => {
                colors[vertex] = Some(color);
                frame.next_color = color + 1;
                let position = frame.position + 1;
                stack.push(Frame {
                    position,
                    next_color: 0,
                });
            }
            None => {
                colors[vertex] = None;
                stack.pop();
            }
        }
    }
    debug!(explored = meter.explored(), "no colouring exists");
    Ok(None)
}
