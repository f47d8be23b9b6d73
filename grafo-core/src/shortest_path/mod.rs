//! Shortest paths: single-source Dijkstra and all-pairs Floyd-Warshall.
//!
//! Directed graphs follow arc directions; undirected edges are walked both
//! ways. Distances to unreachable vertices are `None`, which serializes as
//! `null`. Self-loops never shorten a path.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    error::{AlgorithmError, Result},
    graph::{Graph, IndexedGraph, VertexId},
    paths::{Direction, PathMetric, single_source},
};

/// Distance and tree parent of one vertex in a [`ShortestPaths`] result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathEntry {
    /// The vertex.
    pub vertex: VertexId,
    /// Distance from the source, or `None` when unreachable.
    pub distance: Option<f64>,
    /// Previous vertex on a shortest path; `None` for the source and for
    /// unreachable vertices.
    pub predecessor: Option<VertexId>,
}

/// Shortest-path tree rooted at one source.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShortestPaths {
    /// Root of the tree.
    pub source: VertexId,
    /// One entry per vertex, in natural vertex order.
    pub entries: Vec<PathEntry>,
}

impl ShortestPaths {
    fn entry(&self, vertex: &VertexId) -> Option<&PathEntry> {
        self.entries.iter().find(|entry| &entry.vertex == vertex)
    }

    /// Distance to `vertex`, or `None` when it is unknown or unreachable.
    #[must_use]
    pub fn distance(&self, vertex: &VertexId) -> Option<f64> {
        self.entry(vertex).and_then(|entry| entry.distance)
    }

    /// Vertices from the source to `target` along the tree, both included.
    #[must_use]
    pub fn path_to(&self, target: &VertexId) -> Option<Vec<VertexId>> {
        let mut current = self.entry(target)?;
        current.distance?;
        let mut path = vec![current.vertex.clone()];
        while let Some(previous) = &current.predecessor {
            path.push(previous.clone());
            current = self.entry(previous)?;
        }
        path.reverse();
        Some(path)
    }
}

/// A single shortest path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Path {
    /// Vertices from start to end, both included.
    pub vertices: Vec<VertexId>,
    /// Sum of the edge weights along the path.
    pub length: f64,
}

fn locate(indexed: &IndexedGraph, vertex: &VertexId) -> Result<usize> {
    indexed
        .index_of(vertex)
        .ok_or_else(|| AlgorithmError::VertexNotFound {
            vertex: vertex.clone(),
        })
}

/// Dijkstra's algorithm from `source`.
///
/// Ties between equally short paths keep the predecessor settled first.
///
/// # Errors
/// Returns [`AlgorithmError::VertexNotFound`] for an unknown source and
/// [`AlgorithmError::NegativeWeight`] when any edge weight is negative.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, shortest_path::dijkstra};
///
/// let mut graph = Graph::directed("roads");
/// for id in ["a", "b", "c"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge("a", "b", 5.0, Attributes::new())?;
/// graph.add_edge("a", "c", 1.0, Attributes::new())?;
/// graph.add_edge("c", "b", 2.0, Attributes::new())?;
/// let tree = dijkstra(&graph, &"a".into())?;
/// assert_eq!(tree.distance(&"b".into()), Some(3.0));
/// assert_eq!(tree.path_to(&"b".into()), Some(vec!["a".into(), "c".into(), "b".into()]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "shortest_path.dijkstra",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn dijkstra(graph: &Graph, source: &VertexId) -> Result<ShortestPaths> {
    let indexed = graph.indexed();
    let root = locate(&indexed, source)?;
    PathMetric::for_graph(&indexed, "dijkstra")?;
    let dag = single_source(&indexed, root, PathMetric::Weighted, Direction::Forward);
    let entries = (0..indexed.len())
        .map(|v| {
            let reachable = dag.distance[v].is_finite();
            PathEntry {
                vertex: indexed.id(v).clone(),
                distance: reachable.then_some(dag.distance[v]),
                predecessor: dag.predecessors[v]
                    .first()
                    .map(|&p| indexed.id(p).clone()),
            }
        })
        .collect();
    debug!(reached = dag.order.len(), "dijkstra settled");
    Ok(ShortestPaths {
        source: source.clone(),
        entries,
    })
}

/// Shortest path from `source` to `target` by Dijkstra.
///
/// # Errors
/// Returns the errors of [`dijkstra`], [`AlgorithmError::VertexNotFound`]
/// for an unknown target and [`AlgorithmError::NoPath`] when `target` is
/// unreachable.
pub fn shortest_path(graph: &Graph, source: &VertexId, target: &VertexId) -> Result<Path> {
    if !graph.contains_vertex(target) {
        return Err(AlgorithmError::VertexNotFound {
            vertex: target.clone(),
        });
    }
    let tree = dijkstra(graph, source)?;
    let no_path = || AlgorithmError::NoPath {
        from: source.clone(),
        to: target.clone(),
    };
    let length = tree.distance(target).ok_or_else(no_path)?;
    let vertices = tree.path_to(target).ok_or_else(no_path)?;
    Ok(Path { vertices, length })
}

/// All-pairs shortest distances.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistanceMatrix {
    /// Row and column labels, in natural vertex order.
    pub vertices: Vec<VertexId>,
    /// `distances[i][j]` from `vertices[i]` to `vertices[j]`; `None` when
    /// unreachable.
    pub distances: Vec<Vec<Option<f64>>>,
    #[serde(skip)]
    next: Vec<Vec<Option<usize>>>,
}

impl DistanceMatrix {
    fn position(&self, vertex: &VertexId) -> Option<usize> {
        self.vertices.iter().position(|v| v == vertex)
    }

    /// Distance from `from` to `to`.
    #[must_use]
    pub fn distance(&self, from: &VertexId, to: &VertexId) -> Option<f64> {
        self.distances[self.position(from)?][self.position(to)?]
    }

    /// A shortest path from `from` to `to`, both included.
    #[must_use]
    pub fn path(&self, from: &VertexId, to: &VertexId) -> Option<Vec<VertexId>> {
        let (mut i, j) = (self.position(from)?, self.position(to)?);
        self.distances[i][j]?;
        let mut path = vec![self.vertices[i].clone()];
        while i != j {
            i = self.next[i][j]?;
            path.push(self.vertices[i].clone());
        }
        Some(path)
    }

    /// Greatest distance from each vertex to any other, or `None` for a
    /// vertex that cannot reach every other vertex.
    #[must_use]
    pub fn eccentricities(&self) -> Vec<Option<f64>> {
        self.distances
            .iter()
            .map(|row| row.iter().try_fold(0.0_f64, |far, d| d.map(|d| far.max(d))))
            .collect()
    }

    /// Largest eccentricity; `None` unless every vertex reaches every other.
    #[must_use]
    pub fn diameter(&self) -> Option<f64> {
        self.eccentricities()
            .into_iter()
            .try_fold(0.0_f64, |widest, e| e.map(|e| widest.max(e)))
    }

    /// Vertices of minimum eccentricity; `None` unless every vertex reaches
    /// every other.
    #[must_use]
    pub fn center(&self) -> Option<Vec<VertexId>> {
        let eccentricities: Vec<f64> = self.eccentricities().into_iter().collect::<Option<_>>()?;
        let radius = eccentricities.iter().copied().fold(f64::INFINITY, f64::min);
        Some(
            self.vertices
                .iter()
                .zip(&eccentricities)
                .filter(|&(_, &e)| e == radius)
                .map(|(v, _)| v.clone())
                .collect(),
        )
    }
}

/// Floyd-Warshall all-pairs shortest distances.
///
/// Negative weights are accepted. An undirected edge with a negative weight
/// is a negative cycle on its own.
///
/// # Errors
/// Returns [`AlgorithmError::NegativeCycle`] naming a vertex whose distance
/// to itself drops below zero.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, shortest_path::floyd_warshall};
///
/// let mut graph = Graph::undirected("path");
/// for id in [1, 2, 3] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge(1, 2, 1.0, Attributes::new())?;
/// graph.add_edge(2, 3, 2.5, Attributes::new())?;
/// let matrix = floyd_warshall(&graph)?;
/// assert_eq!(matrix.distance(&1.into(), &3.into()), Some(3.5));
/// assert_eq!(matrix.diameter(), Some(3.5));
/// assert_eq!(matrix.center(), Some(vec![2.into()]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "shortest_path.floyd_warshall",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count())
)]
pub fn floyd_warshall(graph: &Graph) -> Result<DistanceMatrix> {
    let indexed = graph.indexed();
    let n = indexed.len();
    let mut dist = vec![vec![f64::INFINITY; n]; n];
    let mut next: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
    for v in 0..n {
        dist[v][v] = 0.0;
        next[v][v] = Some(v);
    }
    for &(s, t, weight) in indexed.edges() {
        let arcs: &[(usize, usize)] = if indexed.is_directed() || s == t {
            &[(s, t)]
        } else {
            &[(s, t), (t, s)]
        };
        for &(a, b) in arcs {
            if weight < dist[a][b] {
                dist[a][b] = weight;
                next[a][b] = Some(b);
            }
        }
    }
    for k in 0..n {
        for i in 0..n {
            if dist[i][k].is_infinite() {
                continue;
            }
            for j in 0..n {
                let through = dist[i][k] + dist[k][j];
                if through < dist[i][j] {
                    dist[i][j] = through;
                    next[i][j] = next[i][k];
                }
            }
        }
        if let Some(v) = (0..n).find(|&v| dist[v][v] < 0.0) {
            return Err(AlgorithmError::NegativeCycle {
                vertex: indexed.id(v).clone(),
            });
        }
    }
    let distances = dist
        .into_iter()
        .map(|row| row.into_iter().map(|d| d.is_finite().then_some(d)).collect())
        .collect();
    Ok(DistanceMatrix {
        vertices: indexed.ids().to_vec(),
        distances,
        next,
    })
}
