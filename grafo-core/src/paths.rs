//! Single-source shortest-path DAGs in the form Brandes' algorithm needs.
//!
//! Unit-weight graphs use BFS; graphs carrying other weights use Dijkstra.
//! The DAG records the settle order, predecessor lists and path counts so
//! dependency accumulation can walk it backwards.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, VecDeque},
};

use crate::{
    error::{AlgorithmError, Result},
    graph::IndexedGraph,
};

/// How path lengths are measured.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PathMetric {
    Hops,
    Weighted,
}

impl PathMetric {
    /// Picks [`PathMetric::Weighted`] when any edge weight differs from 1.0.
    ///
    /// Negative weights are rejected: Dijkstra cannot handle them.
    pub(crate) fn for_graph(graph: &IndexedGraph, algorithm: &'static str) -> Result<Self> {
        let mut metric = Self::Hops;
        for &(s, t, weight) in graph.edges() {
            if weight < 0.0 {
                return Err(AlgorithmError::NegativeWeight {
                    algorithm,
                    from: graph.id(s).clone(),
                    to: graph.id(t).clone(),
                    weight,
                });
            }
            if weight != 1.0 {
                metric = Self::Weighted;
            }
        }
        Ok(metric)
    }
}

/// Traversal direction relative to stored edges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Forward,
    Reverse,
}

/// Shortest-path DAG rooted at one source.
#[derive(Clone, Debug)]
pub(crate) struct ShortestPathDag {
    /// Vertices in non-decreasing distance order.
    pub(crate) order: Vec<usize>,
    pub(crate) predecessors: Vec<Vec<usize>>,
    /// Number of shortest paths from the source.
    pub(crate) sigma: Vec<f64>,
    /// Distance from the source; `f64::INFINITY` when unreachable.
    pub(crate) distance: Vec<f64>,
}

#[derive(Clone, Copy, Debug)]
struct Frontier {
    distance: f64,
    vertex: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Reversed so `BinaryHeap` pops the closest vertex, lowest index first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

pub(crate) fn single_source(
    graph: &IndexedGraph,
    source: usize,
    metric: PathMetric,
    direction: Direction,
) -> ShortestPathDag {
    match metric {
        PathMetric::Hops => bfs(graph, source, direction),
        PathMetric::Weighted => dijkstra(graph, source, direction),
    }
}

fn step_neighbours(
    graph: &IndexedGraph,
    vertex: usize,
    direction: Direction,
) -> &[crate::graph::Neighbor] {
    match direction {
        Direction::Forward => graph.outgoing(vertex),
        Direction::Reverse => graph.incoming(vertex),
    }
}

fn empty_dag(n: usize, source: usize) -> ShortestPathDag {
    let mut dag = ShortestPathDag {
        order: Vec::with_capacity(n),
        predecessors: vec![Vec::new(); n],
        sigma: vec![0.0; n],
        distance: vec![f64::INFINITY; n],
    };
    dag.sigma[source] = 1.0;
    dag.distance[source] = 0.0;
    dag
}

fn bfs(graph: &IndexedGraph, source: usize, direction: Direction) -> ShortestPathDag {
    let mut dag = empty_dag(graph.len(), source);
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        dag.order.push(v);
        let next = dag.distance[v] + 1.0;
        for neighbour in step_neighbours(graph, v, direction) {
            let w = neighbour.index;
            if w == v {
                continue;
            }
            if dag.distance[w].is_infinite() {
                dag.distance[w] = next;
                queue.push_back(w);
            }
            if dag.distance[w] == next {
                dag.sigma[w] += dag.sigma[v];
                dag.predecessors[w].push(v);
            }
        }
    }
    dag
}

fn dijkstra(graph: &IndexedGraph, source: usize, direction: Direction) -> ShortestPathDag {
    let n = graph.len();
    let mut dag = empty_dag(n, source);
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::from([Frontier {
        distance: 0.0,
        vertex: source,
    }]);
    while let Some(Frontier { distance, vertex: v }) = heap.pop() {
        if settled[v] || distance > dag.distance[v] {
            continue;
        }
        settled[v] = true;
        dag.order.push(v);
        for neighbour in step_neighbours(graph, v, direction) {
            let w = neighbour.index;
            if w == v || settled[w] {
                continue;
            }
            let candidate = distance + neighbour.weight;
            match candidate.total_cmp(&dag.distance[w]) {
                Ordering::Less => {
                    dag.distance[w] = candidate;
                    dag.sigma[w] = dag.sigma[v];
                    dag.predecessors[w].clear();
                    dag.predecessors[w].push(v);
                    heap.push(Frontier {
                        distance: candidate,
                        vertex: w,
                    });
                }
                Ordering::Equal => {
                    dag.sigma[w] += dag.sigma[v];
                    dag.predecessors[w].push(v);
                }
                Ordering::Greater => {}
            }
        }
    }
    dag
}

/// Maps unordered (undirected) or ordered (directed) vertex pairs to edge
/// positions in [`IndexedGraph::edges`].
pub(crate) fn edge_positions(graph: &IndexedGraph) -> HashMap<(usize, usize), usize> {
    graph
        .edges()
        .iter()
        .enumerate()
        .map(|(position, &(s, t, _))| (pair_key(graph, s, t), position))
        .collect()
}

pub(crate) fn pair_key(graph: &IndexedGraph, s: usize, t: usize) -> (usize, usize) {
    if graph.is_directed() { (s, t) } else { (s.min(t), s.max(t)) }
}

/// Raw Brandes edge dependencies summed over all sources, in edge order.
///
/// Undirected graphs count every pair twice; callers rescale.
pub(crate) fn raw_edge_betweenness(graph: &IndexedGraph, metric: PathMetric) -> Vec<f64> {
    let positions = edge_positions(graph);
    let per_source = |source: usize| {
        let mut scores = vec![0.0; graph.edges().len()];
        let dag = single_source(graph, source, metric, Direction::Forward);
        let mut delta = vec![0.0; graph.len()];
        for &w in dag.order.iter().rev() {
            let coefficient = (1.0 + delta[w]) / dag.sigma[w];
            for &v in &dag.predecessors[w] {
                let contribution = dag.sigma[v] * coefficient;
                if let Some(&position) = positions.get(&pair_key(graph, v, w)) {
                    scores[position] += contribution;
                }
                delta[v] += contribution;
            }
        }
        scores
    };
    sum_over_sources(graph.len(), graph.edges().len(), per_source)
}

/// Sums per-source score vectors, in parallel when the `parallel` feature is
/// enabled.
#[cfg(feature = "parallel")]
pub(crate) fn sum_over_sources<F>(sources: usize, width: usize, per_source: F) -> Vec<f64>
where
    F: Fn(usize) -> Vec<f64> + Sync + Send,
{
    use rayon::prelude::*;

    (0..sources)
        .into_par_iter()
        .map(per_source)
        .reduce(|| vec![0.0; width], add_into)
}

/// Sums per-source score vectors sequentially.
#[cfg(not(feature = "parallel"))]
pub(crate) fn sum_over_sources<F>(sources: usize, width: usize, per_source: F) -> Vec<f64>
where
    F: Fn(usize) -> Vec<f64>,
{
    (0..sources).map(per_source).fold(vec![0.0; width], add_into)
}

fn add_into(mut total: Vec<f64>, part: Vec<f64>) -> Vec<f64> {
    for (acc, value) in total.iter_mut().zip(part) {
        *acc += value;
    }
    total
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Direction, PathMetric, raw_edge_betweenness, single_source};
    use crate::test_utils::{weighted, undirected};

    #[rstest]
    fn bfs_counts_parallel_shortest_paths() {
        let graph = undirected(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]).indexed();
        let dag = single_source(&graph, 0, PathMetric::Hops, Direction::Forward);
        assert_eq!(dag.distance, vec![0.0, 1.0, 1.0, 2.0]);
        assert_eq!(dag.sigma[3], 2.0);
        assert_eq!(dag.predecessors[3], vec![1, 2]);
    }

    #[rstest]
    fn dijkstra_prefers_the_lighter_detour() {
        let graph = weighted(&[("a", "b", 5.0), ("a", "c", 1.0), ("c", "b", 1.0)]).indexed();
        let metric = PathMetric::for_graph(&graph, "test").expect("non-negative");
        assert_eq!(metric, PathMetric::Weighted);
        let dag = single_source(&graph, 0, metric, Direction::Forward);
        assert_eq!(dag.distance[1], 2.0);
        assert_eq!(dag.predecessors[1], vec![2]);
    }

    #[rstest]
    fn negative_weights_are_rejected() {
        let graph = weighted(&[("a", "b", -1.0)]).indexed();
        assert!(PathMetric::for_graph(&graph, "test").is_err());
    }

    #[rstest]
    fn bridge_carries_all_cross_pairs() {
        // Path a - b - c: both edges carry two ordered pairs per direction.
        let graph = undirected(&[("a", "b"), ("b", "c")]).indexed();
        let scores = raw_edge_betweenness(&graph, PathMetric::Hops);
        assert_eq!(scores, vec![4.0, 4.0]);
    }
}
