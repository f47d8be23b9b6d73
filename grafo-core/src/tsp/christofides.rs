//! Christofides' 3/2-approximation on a dense metric weight matrix.

use tracing::debug;

use super::{blossom::min_weight_perfect_matching, mst::spanning_tree};

/// Largest odd-vertex set matched by the subset table instead of blossoms.
const SUBSET_MATCHING_LIMIT: usize = 12;

/// Tour order, open and starting at vertex 0.
pub(super) fn christofides_order(weights: &[Vec<f64>]) -> Vec<usize> {
    let n = weights.len();
    let tree = spanning_tree(weights);
    let mut degree = vec![0_usize; n];
    for edge in &tree {
        degree[edge.source] += 1;
        degree[edge.target] += 1;
    }
    let odd: Vec<usize> = (0..n).filter(|&v| degree[v] % 2 == 1).collect();
    let matching = if odd.len() <= SUBSET_MATCHING_LIMIT {
        subset_matching(&odd, weights)
    } else {
        min_weight_perfect_matching(odd.len(), |a, b| weights[odd[a]][odd[b]])
            .into_iter()
            .map(|(a, b)| (odd[a], odd[b]))
            .collect()
    };
    debug!(
        tree_edges = tree.len(),
        odd = odd.len(),
        "christofides matching built"
    );

    let mut multigraph: Vec<(usize, usize)> =
        tree.iter().map(|edge| (edge.source, edge.target)).collect();
    multigraph.extend(matching);
    shortcut(&euler_circuit(n, &multigraph))
}

/// Minimum-weight perfect matching by dynamic programming over subsets. The
/// lowest unmatched vertex of each subset is always paired first, which keeps
/// the table at `2^k` entries.
#[expect(
    clippy::cast_possible_truncation,
    reason = "at most SUBSET_MATCHING_LIMIT odd vertices reach the table"
)]
fn subset_matching(odd: &[usize], weights: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let k = odd.len();
    if k == 0 {
        return Vec::new();
    }
    let full: u32 = (1 << k) - 1;
    let mut cost = vec![f64::INFINITY; 1 << k];
    let mut pair = vec![(0_u8, 0_u8); 1 << k];
    cost[0] = 0.0;
    for mask in 0..full {
        let base = cost[mask as usize];
        if !base.is_finite() {
            continue;
        }
        let first = (!mask).trailing_zeros() as usize;
        for second in (first + 1)..k {
            if mask & (1 << second) != 0 {
                continue;
            }
            let next = (mask | (1 << first) | (1 << second)) as usize;
            let candidate = base + weights[odd[first]][odd[second]];
            if candidate < cost[next] {
                cost[next] = candidate;
                pair[next] = (first as u8, second as u8);
            }
        }
    }

    let mut matched = Vec::with_capacity(k / 2);
    let mut mask = full;
    while mask != 0 {
        let (first, second) = pair[mask as usize];
        matched.push((odd[usize::from(first)], odd[usize::from(second)]));
        mask &= !((1 << first) | (1 << second));
    }
    matched
}

/// Eulerian circuit of a connected even-degree multigraph, from vertex 0.
fn euler_circuit(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut incident: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (index, &(a, b)) in edges.iter().enumerate() {
        incident[a].push((b, index));
        incident[b].push((a, index));
    }
    let mut used = vec![false; edges.len()];
    let mut cursor = vec![0_usize; n];
    let mut stack = vec![0_usize];
    let mut circuit = Vec::with_capacity(edges.len() + 1);
    while let Some(&vertex) = stack.last() {
        let mut next = None;
        while let Some(&(neighbor, edge)) = incident[vertex].get(cursor[vertex]) {
            cursor[vertex] += 1;
            if !used[edge] {
                used[edge] = true;
                next = Some(neighbor);
                break;
            }
        }
        match next {
            Some(neighbor) => stack.push(neighbor),
            None => {
                stack.pop();
                circuit.push(vertex);
            }
        }
    }
    circuit.reverse();
    circuit
}

/// Keeps the first visit of each vertex.
fn shortcut(circuit: &[usize]) -> Vec<usize> {
    let mut seen = vec![false; circuit.iter().max().map_or(0, |&v| v + 1)];
    circuit
        .iter()
        .copied()
        .filter(|&v| !std::mem::replace(&mut seen[v], true))
        .collect()
}
