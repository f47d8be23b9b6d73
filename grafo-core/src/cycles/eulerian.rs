//! Eulerian classification and Hierholzer walks.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::{AlgorithmError, Result},
    graph::{IndexedGraph, VertexId},
    union_find::DisjointSet,
};

/// Which Eulerian walk a graph admits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EulerianKind {
    /// A closed walk uses every edge once. Edgeless graphs count as circuits.
    Circuit,
    /// An open walk uses every edge once.
    Path,
    /// No walk uses every edge exactly once.
    #[serde(rename = "none")]
    Neither,
}

/// Degree analysis of one graph.
pub(super) enum Shape {
    Edgeless,
    Circuit,
    Path {
        start: usize,
        reason: Arc<str>,
    },
    Broken {
        vertex: usize,
        reason: Arc<str>,
    },
}

impl Shape {
    pub(super) const fn kind(&self) -> EulerianKind {
        match self {
            Self::Edgeless | Self::Circuit => EulerianKind::Circuit,
            Self::Path { .. } => EulerianKind::Path,
            Self::Broken { .. } => EulerianKind::Neither,
        }
    }
}

pub(super) fn classify(indexed: &IndexedGraph) -> Shape {
    let n = indexed.len();
    let mut out_degree = vec![0_usize; n];
    let mut in_degree = vec![0_usize; n];
    let mut components = DisjointSet::new(n);
    for &(s, t, _) in indexed.edges() {
        out_degree[s] += 1;
        in_degree[t] += 1;
        components.union(s, t);
    }
    let touched = |v: usize| out_degree[v] + in_degree[v] > 0;
    let Some(anchor) = (0..n).find(|&v| touched(v)) else {
        return Shape::Edgeless;
    };
    let root = components.find(anchor);
    if let Some(stray) = (0..n).find(|&v| touched(v) && components.find(v) != root) {
        return Shape::Broken {
            vertex: stray,
            reason: Arc::from("edges lie in more than one component"),
        };
    }
    if indexed.is_directed() {
        classify_directed(&out_degree, &in_degree)
    } else {
        let degree: Vec<usize> = (0..n).map(|v| out_degree[v] + in_degree[v]).collect();
        classify_undirected(&degree)
    }
}

fn classify_undirected(degree: &[usize]) -> Shape {
    let odd: Vec<usize> = (0..degree.len()).filter(|&v| degree[v] % 2 == 1).collect();
    match odd.as_slice() {
        [] => Shape::Circuit,
        [start, _] => Shape::Path {
            start: *start,
            reason: Arc::from(format!("odd degree {}", degree[*start])),
        },
        [_, _, third, ..] => Shape::Broken {
            vertex: *third,
            reason: Arc::from("more than two vertices have odd degree"),
        },
        // Odd-degree vertices always come in pairs.
        [only] => Shape::Broken {
            vertex: *only,
            reason: Arc::from("odd degree"),
        },
    }
}

fn classify_directed(out_degree: &[usize], in_degree: &[usize]) -> Shape {
    let mut start = None;
    let mut end = None;
    for v in 0..out_degree.len() {
        let (out, inward) = (out_degree[v], in_degree[v]);
        let slot = if out == inward + 1 {
            &mut start
        } else if inward == out + 1 {
            &mut end
        } else if out == inward {
            continue;
        } else {
            return Shape::Broken {
                vertex: v,
                reason: Arc::from(format!(
                    "out-degree {out} and in-degree {inward} differ by more than one"
                )),
            };
        };
        if slot.is_some() {
            return Shape::Broken {
                vertex: v,
                reason: Arc::from("more than one vertex is unbalanced in the same direction"),
            };
        }
        *slot = Some(v);
    }
    match (start, end) {
        (Some(start), Some(_)) => Shape::Path {
            start,
            reason: Arc::from(format!(
                "out-degree {} exceeds in-degree {}",
                out_degree[start], in_degree[start]
            )),
        },
        _ => Shape::Circuit,
    }
}

pub(super) fn not_eulerian(indexed: &IndexedGraph, vertex: usize, reason: Arc<str>) -> AlgorithmError {
    AlgorithmError::NotEulerian {
        vertex: indexed.id(vertex).clone(),
        reason,
    }
}

/// First vertex with an incident edge.
pub(super) fn first_touched(indexed: &IndexedGraph) -> Option<usize> {
    indexed
        .edges()
        .iter()
        .map(|&(s, t, _)| s.min(t))
        .min()
}

pub(super) fn has_edges(indexed: &IndexedGraph, vertex: usize) -> bool {
    !indexed.outgoing(vertex).is_empty() || !indexed.incoming(vertex).is_empty()
}

/// Hierholzer's walk from `start`, assuming the degree conditions hold.
pub(super) fn hierholzer(indexed: &IndexedGraph, start: usize) -> Result<Vec<VertexId>> {
    let mut incident: Vec<Vec<(usize, usize)>> = vec![Vec::new(); indexed.len()];
    for (index, &(s, t, _)) in indexed.edges().iter().enumerate() {
        incident[s].push((t, index));
        if !indexed.is_directed() && s != t {
            incident[t].push((s, index));
        }
    }
    let edge_count = indexed.edges().len();
    let mut used = vec![false; edge_count];
    let mut cursor = vec![0_usize; indexed.len()];
    let mut stack = vec![start];
    let mut walk = Vec::with_capacity(edge_count + 1);
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
                walk.push(vertex);
            }
        }
    }
    if walk.len() != edge_count + 1 {
        // Only reachable when the caller skipped classification.
        return Err(not_eulerian(
            indexed,
            start,
            Arc::from("walk from this vertex misses some edges"),
        ));
    }
    walk.reverse();
    Ok(walk.into_iter().map(|v| indexed.id(v).clone()).collect())
}
