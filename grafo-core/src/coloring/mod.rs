//! Vertex and edge colouring.
//!
//! All strategies colour the underlying simple undirected graph: edge
//! directions are ignored and a self-loop is rejected with
//! [`AlgorithmError::SelfLoop`] because no proper colouring exists. Colours are
//! `0..color_count`.
//!
//! The chromatic number reported by [`chromatic_number_upper_bound`] is the
//! fewest colours any heuristic used. It is an upper bound, not the exact
//! chromatic number; [`is_k_colorable`] answers the exact question under a
//! search budget.

mod exact;

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use self::exact::is_k_colorable;
use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
};

/// Vertex colouring heuristic.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColoringStrategy {
    /// First-fit in natural (or caller) order.
    Greedy,
    /// First-fit in descending degree order.
    WelshPowell,
    /// Highest saturation first.
    Dsatur,
}

impl ColoringStrategy {
    /// Every strategy, in the order [`chromatic_number_upper_bound`] tries them.
    pub const ALL: [Self; 3] = [Self::Greedy, Self::WelshPowell, Self::Dsatur];

    /// Stable name of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::WelshPowell => "welsh_powell",
            Self::Dsatur => "dsatur",
        }
    }
}

impl fmt::Display for ColoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColoringStrategy {
    type Err = AlgorithmError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == raw)
            .ok_or_else(|| {
                AlgorithmError::invalid_parameter(
                    "strategy",
                    format!("unknown colouring strategy `{raw}`"),
                )
            })
    }
}

/// Colour assigned to each vertex, in natural vertex order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Coloring {
    colors: IndexMap<VertexId, usize>,
    color_count: usize,
}

impl Coloring {
    fn from_indexed(graph: &IndexedGraph, colors: &[usize]) -> Self {
        let color_count = colors.iter().max().map_or(0, |max| max + 1);
        Self {
            colors: graph.ids().iter().cloned().zip(colors.iter().copied()).collect(),
            color_count,
        }
    }

    /// Colour of a vertex.
    #[must_use]
    pub fn color(&self, id: &VertexId) -> Option<usize> {
        self.colors.get(id).copied()
    }

    /// Number of distinct colours used.
    #[must_use]
    #[rustfmt::skip]
    pub const fn color_count(&self) -> usize { self.color_count }

    /// The full assignment.
    #[must_use]
    pub const fn colors(&self) -> &IndexMap<VertexId, usize> {
        &self.colors
    }

    /// Vertices grouped by colour; class `c` lists colour `c` vertices in
    /// natural order.
    #[must_use]
    pub fn classes(&self) -> Vec<Vec<VertexId>> {
        let mut classes = vec![Vec::new(); self.color_count];
        for (id, &color) in &self.colors {
            if let Some(class) = classes.get_mut(color) {
                class.push(id.clone());
            }
        }
        classes
    }
}

/// Colours `graph` with the chosen heuristic.
///
/// # Errors
/// Returns [`AlgorithmError::SelfLoop`] if the graph has a self-loop.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, coloring::{ColoringStrategy, color_graph}};
///
/// let mut graph = Graph::undirected("triangle");
/// for id in 0..3 {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge(0, 1, 1.0, Attributes::new())?;
/// graph.add_edge(1, 2, 1.0, Attributes::new())?;
/// graph.add_edge(2, 0, 1.0, Attributes::new())?;
/// let coloring = color_graph(&graph, ColoringStrategy::Dsatur)?;
/// assert_eq!(coloring.color_count(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "coloring.color",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
pub fn color_graph(graph: &Graph, strategy: ColoringStrategy) -> Result<Coloring> {
    match strategy {
        ColoringStrategy::Greedy => greedy_coloring(graph, None),
        ColoringStrategy::WelshPowell => welsh_powell_coloring(graph),
        ColoringStrategy::Dsatur => dsatur_coloring(graph),
    }
}

/// First-fit colouring in the given order.
///
/// Without `order` the natural vertex order is used. A partial order is
/// completed with the remaining vertices in natural order; repeated entries
/// are ignored.
///
/// # Errors
/// Returns [`AlgorithmError::VertexNotFound`] if `order` names an unknown
/// vertex and [`AlgorithmError::SelfLoop`] if the graph has a self-loop.
pub fn greedy_coloring(graph: &Graph, order: Option<&[VertexId]>) -> Result<Coloring> {
    let indexed = simple_snapshot(graph, "greedy_coloring")?;
    let mut sequence = Vec::with_capacity(indexed.len());
    let mut placed = vec![false; indexed.len()];
    for id in order.unwrap_or_default() {
        let index = indexed
            .index_of(id)
            .ok_or_else(|| AlgorithmError::VertexNotFound { vertex: id.clone() })?;
        if !std::mem::replace(&mut placed[index], true) {
            sequence.push(index);
        }
    }
    sequence.extend((0..indexed.len()).filter(|&v| !placed[v]));
    let colors = first_fit(&indexed.simple_adjacency(), &sequence);
    Ok(Coloring::from_indexed(&indexed, &colors))
}

/// Welsh-Powell: first-fit in descending degree order, ties by vertex id.
///
/// # Errors
/// Returns [`AlgorithmError::SelfLoop`] if the graph has a self-loop.
pub fn welsh_powell_coloring(graph: &Graph) -> Result<Coloring> {
    let indexed = simple_snapshot(graph, "welsh_powell")?;
    let adjacency = indexed.simple_adjacency();
    let mut sequence: Vec<usize> = (0..indexed.len()).collect();
    sequence.sort_by(|&a, &b| {
        adjacency[b]
            .len()
            .cmp(&adjacency[a].len())
            .then_with(|| indexed.id(a).cmp(indexed.id(b)))
    });
    let colors = first_fit(&adjacency, &sequence);
    Ok(Coloring::from_indexed(&indexed, &colors))
}

/// DSatur: repeatedly colours the uncoloured vertex with the most distinct
/// neighbour colours, ties by highest uncoloured-neighbour degree, then by
/// lowest vertex id.
///
/// # Errors
/// Returns [`AlgorithmError::SelfLoop`] if the graph has a self-loop.
pub fn dsatur_coloring(graph: &Graph) -> Result<Coloring> {
    let indexed = simple_snapshot(graph, "dsatur")?;
    let rank = indexed.id_ranks();
    let colors = dsatur(&indexed.simple_adjacency(), &rank);
    Ok(Coloring::from_indexed(&indexed, &colors))
}

/// Colour assigned to one edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeColor {
    /// Edge source as stored.
    pub source: VertexId,
    /// Edge target as stored.
    pub target: VertexId,
    /// Assigned colour.
    pub color: usize,
}

/// Proper edge colouring: edges sharing an endpoint get different colours.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeColoring {
    /// Colours in edge insertion order.
    pub edges: Vec<EdgeColor>,
    /// Number of distinct colours used.
    pub color_count: usize,
}

/// Edge colouring by DSatur on the line graph.
///
/// Edge directions are ignored. A self-loop conflicts with every other edge
/// at its vertex.
#[instrument(
    name = "coloring.edges",
    level = "debug",
    skip(graph),
    fields(edges = graph.edge_count())
)]
#[must_use]
pub fn edge_coloring(graph: &Graph) -> EdgeColoring {
    let indexed = graph.indexed();
    let edges = indexed.edges();
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); indexed.len()];
    for (position, &(s, t, _)) in edges.iter().enumerate() {
        incident[s].push(position);
        if s != t {
            incident[t].push(position);
        }
    }
    let mut line = vec![Vec::new(); edges.len()];
    for around in &incident {
        for (i, &a) in around.iter().enumerate() {
            for &b in around.iter().skip(i + 1) {
                line[a].push(b);
                line[b].push(a);
            }
        }
    }
    for neighbours in &mut line {
        neighbours.sort_unstable();
        neighbours.dedup();
    }
    let rank: Vec<usize> = (0..edges.len()).collect();
    let colors = dsatur(&line, &rank);
    let color_count = colors.iter().max().map_or(0, |max| max + 1);
    EdgeColoring {
        edges: graph
            .edges()
            .zip(colors)
            .map(|(edge, color)| EdgeColor {
                source: edge.source().clone(),
                target: edge.target().clone(),
                color,
            })
            .collect(),
        color_count,
    }
}

/// Fewest colours found by any heuristic, with the winning colouring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChromaticEstimate {
    /// Upper bound on the chromatic number.
    pub upper_bound: usize,
    /// Heuristic that achieved the bound (first in [`ColoringStrategy::ALL`]
    /// order on ties).
    pub strategy: ColoringStrategy,
    /// The colouring achieving the bound.
    pub coloring: Coloring,
}

/// Upper bound on the chromatic number: the best of greedy, Welsh-Powell and
/// DSatur. Not a proven minimum.
///
/// # Errors
/// Returns [`AlgorithmError::SelfLoop`] if the graph has a self-loop.
#[instrument(name = "coloring.chromatic_upper_bound", level = "debug", err, skip(graph))]
pub fn chromatic_number_upper_bound(graph: &Graph) -> Result<ChromaticEstimate> {
    let mut best: Option<ChromaticEstimate> = None;
    for strategy in ColoringStrategy::ALL {
        let coloring = color_graph(graph, strategy)?;
        let improves = best
            .as_ref()
            .is_none_or(|current| coloring.color_count() < current.upper_bound);
        if improves {
            best = Some(ChromaticEstimate {
                upper_bound: coloring.color_count(),
                strategy,
                coloring,
            });
        }
    }
    let estimate = best.ok_or(AlgorithmError::EmptyGraph {
        algorithm: "chromatic_number",
    })?;
    debug!(upper_bound = estimate.upper_bound, strategy = %estimate.strategy, "chromatic bound");
    Ok(estimate)
}

/// Returns `true` when every vertex has a colour and no edge joins two
/// vertices of the same colour. Self-loops always invalidate a colouring.
#[must_use]
pub fn is_valid_coloring(graph: &Graph, colors: &IndexMap<VertexId, usize>) -> bool {
    graph.vertices().all(|id| colors.contains_key(id))
        && graph.edges().all(|edge| {
            match (colors.get(edge.source()), colors.get(edge.target())) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            }
        })
}

pub(crate) fn simple_snapshot(graph: &Graph, algorithm: &'static str) -> Result<IndexedGraph> {
    let indexed = graph.indexed();
    if let Some(vertex) = indexed.first_self_loop() {
        return Err(AlgorithmError::SelfLoop {
            algorithm,
            vertex: indexed.id(vertex).clone(),
        });
    }
    Ok(indexed)
}

fn smallest_free_color(adjacency: &[Vec<usize>], colors: &[Option<usize>], vertex: usize) -> usize {
    let mut used = vec![false; adjacency[vertex].len() + 1];
    for &neighbour in &adjacency[vertex] {
        if let Some(color) = colors[neighbour] {
            if let Some(slot) = used.get_mut(color) {
                *slot = true;
            }
        }
    }
    used.iter().position(|taken| !taken).unwrap_or(used.len())
}

fn first_fit(adjacency: &[Vec<usize>], sequence: &[usize]) -> Vec<usize> {
    let mut colors: Vec<Option<usize>> = vec![None; adjacency.len()];
    for &vertex in sequence {
        colors[vertex] = Some(smallest_free_color(adjacency, &colors, vertex));
    }
    colors.into_iter().map(Option::unwrap_or_default).collect()
}

fn dsatur(adjacency: &[Vec<usize>], rank: &[usize]) -> Vec<usize> {
    let n = adjacency.len();
    let mut colors: Vec<Option<usize>> = vec![None; n];
    let mut neighbour_colors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut uncolored_degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    for _ in 0..n {
        let Some(vertex) = (0..n).filter(|&v| colors[v].is_none()).max_by(|&a, &b| {
            neighbour_colors[a]
                .len()
                .cmp(&neighbour_colors[b].len())
                .then_with(|| uncolored_degree[a].cmp(&uncolored_degree[b]))
                .then_with(|| rank[b].cmp(&rank[a]))
        }) else {
            break;
        };
        let color = smallest_free_color(adjacency, &colors, vertex);
        colors[vertex] = Some(color);
        for &neighbour in &adjacency[vertex] {
            uncolored_degree[neighbour] = uncolored_degree[neighbour].saturating_sub(1);
            if let Err(slot) = neighbour_colors[neighbour].binary_search(&color) {
                neighbour_colors[neighbour].insert(slot, color);
            }
        }
    }
    colors.into_iter().map(Option::unwrap_or_default).collect()
}
