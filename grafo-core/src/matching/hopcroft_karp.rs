//! Hopcroft-Karp augmenting phases.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, instrument};

use super::{Bipartition, Side, two_colour};
use crate::{
    error::Result,
    graph::{Graph, VertexId},
};

/// One matched edge, oriented from the left side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    /// Endpoint on the left side.
    pub left: VertexId,
    /// Endpoint on the right side.
    pub right: VertexId,
}

/// A maximum matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Matching {
    /// Matched pairs ordered by the natural order of their left vertex.
    pub pairs: Vec<MatchedPair>,
    /// Number of matched pairs.
    pub size: usize,
}

impl Matching {
    /// Partner of `vertex`, on whichever side it lies.
    #[must_use]
    pub fn partner(&self, vertex: &VertexId) -> Option<&VertexId> {
        self.pairs.iter().find_map(|pair| {
            if &pair.left == vertex {
                Some(&pair.right)
            } else if &pair.right == vertex {
                Some(&pair.left)
            } else {
                None
            }
        })
    }
}

const UNREACHED: usize = usize::MAX;

struct Phases {
    /// Right-side neighbours of each left vertex, in natural order.
    adjacency: Vec<Vec<usize>>,
    left: Vec<usize>,
    mate_of_left: Vec<Option<usize>>,
    mate_of_right: Vec<Option<usize>>,
    layer: Vec<usize>,
    cursor: Vec<usize>,
}

impl Phases {
    /// Layers free left vertices at 0 and alternates through matched edges.
    /// Returns `true` when some free right vertex is reachable.
    fn layer(&mut self) -> bool {
        let mut queue = VecDeque::new();
        self.layer.fill(UNREACHED);
        for &u in &self.left {
            if self.mate_of_left[u].is_none() {
                self.layer[u] = 0;
                queue.push_back(u);
            }
        }
        let mut shortest = UNREACHED;
        while let Some(u) = queue.pop_front() {
            if self.layer[u] >= shortest {
                continue;
            }
            for &v in &self.adjacency[u] {
                match self.mate_of_right[v] {
                    None => shortest = shortest.min(self.layer[u] + 1),
                    Some(w) if self.layer[w] == UNREACHED => {
                        self.layer[w] = self.layer[u] + 1;
                        queue.push_back(w);
                    }
                    Some(_) => {}
                }
            }
        }
        shortest != UNREACHED
    }

    /// Depth-first search along the layering from the free vertex `root`,
    /// flipping the path when it reaches a free right vertex.
    fn augment(&mut self, root: usize) -> bool {
        let mut path = vec![root];
        let mut via: Vec<usize> = Vec::new();
        while let Some(&u) = path.last() {
            let Some(&v) = self.adjacency[u].get(self.cursor[u]) else {
                self.layer[u] = UNREACHED;
                path.pop();
                via.pop();
                continue;
            };
            self.cursor[u] += 1;
            match self.mate_of_right[v] {
                None => {
                    via.push(v);
                    for (&l, &r) in path.iter().zip(&via) {
                        self.mate_of_left[l] = Some(r);
                        self.mate_of_right[r] = Some(l);
                    }
                    return true;
                }
                Some(w) if self.layer[w] == self.layer[u] + 1 => {
                    via.push(v);
                    path.push(w);
                }
                Some(_) => {}
            }
        }
        false
    }
}

/// Maximum cardinality matching by Hopcroft-Karp in O(E √V).
///
/// With `sides` the declared split is validated and its left side is
/// matched; without it the split comes from [`super::bipartition`].
/// Self-loops make a graph non-bipartite.
///
/// # Errors
/// Returns [`crate::AlgorithmError::NotBipartite`] when no split was declared
/// and the graph has an odd cycle, and the errors of
/// [`Bipartition::validate`] for a declared split.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, matching::hopcroft_karp};
///
/// let mut graph = Graph::undirected("jobs");
/// for id in ["ann", "bob", "x", "y"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge("ann", "x", 1.0, Attributes::new())?;
/// graph.add_edge("ann", "y", 1.0, Attributes::new())?;
/// graph.add_edge("bob", "x", 1.0, Attributes::new())?;
/// let matching = hopcroft_karp(&graph, None)?;
/// assert_eq!(matching.size, 2);
/// assert_eq!(matching.partner(&"bob".into()), Some(&"x".into()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "matching.hopcroft_karp",
    level = "debug",
    err,
    skip(graph, sides),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn hopcroft_karp(graph: &Graph, sides: Option<&Bipartition>) -> Result<Matching> {
    let indexed = graph.indexed();
    let sides = match sides {
        Some(declared) => declared.sides(&indexed)?,
        None => two_colour(&indexed)?,
    };
    let n = indexed.len();
    let left: Vec<usize> = (0..n).filter(|&v| sides[v] == Side::Left).collect();
    let mut adjacency = indexed.simple_adjacency();
    for (vertex, neighbours) in adjacency.iter_mut().enumerate() {
        if sides[vertex] == Side::Right {
            neighbours.clear();
        }
    }
    let mut phases = Phases {
        adjacency,
        left,
        mate_of_left: vec![None; n],
        mate_of_right: vec![None; n],
        layer: vec![UNREACHED; n],
        cursor: vec![0; n],
    };

    let mut rounds = 0_usize;
    while phases.layer() {
        rounds += 1;
        phases.cursor.fill(0);
        let free: Vec<usize> = phases
            .left
            .iter()
            .copied()
            .filter(|&u| phases.mate_of_left[u].is_none())
            .collect();
        for u in free {
            phases.augment(u);
        }
    }

    let pairs: Vec<MatchedPair> = phases
        .left
        .iter()
        .filter_map(|&u| {
            phases.mate_of_left[u].map(|v| MatchedPair {
                left: indexed.id(u).clone(),
                right: indexed.id(v).clone(),
            })
        })
        .collect();
    debug!(size = pairs.len(), rounds, "matching computed");
    Ok(Matching {
        size: pairs.len(),
        pairs,
    })
}
