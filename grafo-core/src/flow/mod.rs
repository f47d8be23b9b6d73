//! Maximum flow and minimum cut by Edmonds-Karp.
//!
//! An edge's capacity is its numeric `capacity` attribute when present,
//! otherwise its weight. Undirected edges become two opposite arcs with the
//! same capacity. Self-loops never carry flow and are ignored.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    error::{AlgorithmError, Result},
    graph::{Edge, Graph, VertexId},
};

/// Attribute consulted for edge capacities before falling back to weight.
pub const CAPACITY_KEY: &str = "capacity";

/// Residual capacities at or below this are treated as saturated.
const RESIDUAL_EPSILON: f64 = 1e-12;

/// Flow carried by one graph edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowArc {
    /// Tail of the arc. For undirected edges, the end the net flow leaves.
    pub source: VertexId,
    /// Head of the arc.
    pub target: VertexId,
    /// Edge capacity.
    pub capacity: f64,
    /// Flow in `[0, capacity]`.
    pub flow: f64,
}

/// Edge crossing a minimum cut from the source side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CutEdge {
    /// Endpoint on the source side.
    pub source: VertexId,
    /// Endpoint on the sink side.
    pub target: VertexId,
    /// Capacity of the edge.
    pub capacity: f64,
}

/// Minimum s-t cut read from the final residual network.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MinCut {
    /// Vertices reachable from the source in the residual network.
    pub source_side: Vec<VertexId>,
    /// All other vertices, including the sink.
    pub sink_side: Vec<VertexId>,
    /// Saturated edges from the source side to the sink side.
    pub edges: Vec<CutEdge>,
    /// Sum of the cut edge capacities; equals the maximum flow value.
    pub capacity: f64,
}

/// Result of a maximum flow computation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaxFlow {
    /// Total flow leaving the source.
    pub value: f64,
    /// Flow per edge, in edge insertion order. Self-loops are omitted.
    pub arcs: Vec<FlowArc>,
    /// A minimum cut certifying optimality.
    pub cut: MinCut,
}

/// Residual network with paired arcs: arc `i ^ 1` is the reverse of arc `i`.
struct Residual {
    heads: Vec<usize>,
    residual: Vec<f64>,
    outgoing: Vec<Vec<usize>>,
}

impl Residual {
    fn new(n: usize) -> Self {
        Self {
            heads: Vec::new(),
            residual: Vec::new(),
            outgoing: vec![Vec::new(); n],
        }
    }

    /// Adds `from -> to` with `capacity` and its zero-capacity reverse.
    /// Returns the forward arc index.
    fn add_arc(&mut self, from: usize, to: usize, capacity: f64) -> usize {
        let forward = self.heads.len();
        self.heads.push(to);
        self.residual.push(capacity);
        self.outgoing[from].push(forward);
        self.heads.push(from);
        self.residual.push(0.0);
        self.outgoing[to].push(forward + 1);
        forward
    }

    /// BFS over unsaturated arcs. Returns the arc used to reach each vertex.
    fn search(&self, source: usize) -> Vec<Option<usize>> {
        let mut via: Vec<Option<usize>> = vec![None; self.outgoing.len()];
        let mut seen = vec![false; self.outgoing.len()];
        seen[source] = true;
        let mut queue = VecDeque::from([source]);
        while let Some(vertex) = queue.pop_front() {
            for &arc in &self.outgoing[vertex] {
                let head = self.heads[arc];
                if !seen[head] && self.residual[arc] > RESIDUAL_EPSILON {
                    seen[head] = true;
                    via[head] = Some(arc);
                    queue.push_back(head);
                }
            }
        }
        via
    }

    /// Augments along the BFS path to `sink`, returning the pushed amount.
    fn augment(&mut self, via: &[Option<usize>], source: usize, sink: usize) -> f64 {
        let mut bottleneck = f64::INFINITY;
        let mut vertex = sink;
        while vertex != source {
            let Some(arc) = via[vertex] else {
                return 0.0;
            };
            bottleneck = bottleneck.min(self.residual[arc]);
            vertex = self.heads[arc ^ 1];
        }
        vertex = sink;
        while vertex != source {
            let Some(arc) = via[vertex] else {
                break;
            };
            self.residual[arc] -= bottleneck;
            self.residual[arc ^ 1] += bottleneck;
            vertex = self.heads[arc ^ 1];
        }
        bottleneck
    }
}

fn capacity_of(edge: &Edge) -> Result<f64> {
    let capacity = match edge.attributes().get(CAPACITY_KEY) {
        Some(value) => value.as_f64().unwrap_or(f64::NAN),
        None => edge.weight(),
    };
    if capacity.is_finite() && capacity >= 0.0 {
        Ok(capacity)
    } else {
        Err(AlgorithmError::InvalidCapacity {
            from: edge.source().clone(),
            to: edge.target().clone(),
            capacity,
        })
    }
}

/// Arcs built for one graph edge.
struct EdgeArcs {
    tail: usize,
    head: usize,
    capacity: f64,
    forward: usize,
    backward: Option<usize>,
}

/// Maximum `source`-`sink` flow with a matching minimum cut.
///
/// # Errors
/// Returns [`AlgorithmError::VertexNotFound`] for an unknown terminal,
/// [`AlgorithmError::InvalidParameter`] when `source == sink` and
/// [`AlgorithmError::InvalidCapacity`] for a negative, non-finite or
/// non-numeric capacity.
///
/// # Examples
/// ```
/// use grafo_core::{Attributes, Graph, flow::max_flow};
///
/// let mut graph = Graph::directed("diamond");
/// for id in ["s", "a", "b", "t"] {
///     graph.add_vertex(id, Attributes::new())?;
/// }
/// graph.add_edge("s", "a", 3.0, Attributes::new())?;
/// graph.add_edge("s", "b", 2.0, Attributes::new())?;
/// graph.add_edge("a", "t", 2.0, Attributes::new())?;
/// graph.add_edge("b", "t", 3.0, Attributes::new())?;
/// let flow = max_flow(&graph, &"s".into(), &"t".into())?;
/// assert_eq!(flow.value, 4.0);
/// assert_eq!(flow.cut.capacity, 4.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "flow.max_flow",
    level = "debug",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn max_flow(graph: &Graph, source: &VertexId, sink: &VertexId) -> Result<MaxFlow> {
    let indexed = graph.indexed();
    let locate = |id: &VertexId| {
        indexed
            .index_of(id)
            .ok_or_else(|| AlgorithmError::VertexNotFound { vertex: id.clone() })
    };
    let (s, t) = (locate(source)?, locate(sink)?);
    if s == t {
        return Err(AlgorithmError::invalid_parameter(
            "sink",
            "source and sink must differ",
        ));
    }

    let mut network = Residual::new(indexed.len());
    let mut built = Vec::with_capacity(graph.edge_count());
    for (edge, &(tail, head, _)) in graph.edges().zip(indexed.edges()) {
        let capacity = capacity_of(edge)?;
        if tail == head {
            continue;
        }
        let forward = network.add_arc(tail, head, capacity);
        let backward = (!graph.is_directed()).then(|| network.add_arc(head, tail, capacity));
        built.push(EdgeArcs {
            tail,
            head,
            capacity,
            forward,
            backward,
        });
    }

    let mut value = 0.0;
    let mut augmentations = 0_usize;
    loop {
        let via = network.search(s);
        if via[t].is_none() {
            break;
        }
        value += network.augment(&via, s, t);
        augmentations += 1;
    }
    debug!(value, augmentations, "max flow computed");

    let reachable: Vec<bool> = {
        let via = network.search(s);
        (0..indexed.len()).map(|v| v == s || via[v].is_some()).collect()
    };
    let mut arcs = Vec::with_capacity(built.len());
    let mut cut_edges = Vec::new();
    for arc in &built {
        let pushed = |index: usize| arc.capacity - network.residual[index];
        let net = pushed(arc.forward) - arc.backward.map_or(0.0, pushed);
        let (tail, head) = if net < 0.0 { (arc.head, arc.tail) } else { (arc.tail, arc.head) };
        arcs.push(FlowArc {
            source: indexed.id(tail).clone(),
            target: indexed.id(head).clone(),
            capacity: arc.capacity,
            flow: net.abs().min(arc.capacity),
        });
        let crossing = match (reachable[arc.tail], reachable[arc.head]) {
            (true, false) => Some((arc.tail, arc.head)),
            (false, true) if arc.backward.is_some() => Some((arc.head, arc.tail)),
            _ => None,
        };
        if let Some((near, far)) = crossing {
            cut_edges.push(CutEdge {
                source: indexed.id(near).clone(),
                target: indexed.id(far).clone(),
                capacity: arc.capacity,
            });
        }
    }
    let (source_side, sink_side): (Vec<usize>, Vec<usize>) =
        (0..indexed.len()).partition(|&v| reachable[v]);
    let ids = |side: Vec<usize>| -> Vec<VertexId> {
        side.into_iter().map(|v| indexed.id(v).clone()).collect()
    };
    Ok(MaxFlow {
        value,
        arcs,
        cut: MinCut {
            source_side: ids(source_side),
            sink_side: ids(sink_side),
            capacity: cut_edges.iter().map(|edge| edge.capacity).sum(),
            edges: cut_edges,
        },
    })
}

/// Minimum `source`-`sink` cut; see [`max_flow`].
///
/// # Errors
/// As [`max_flow`].
pub fn min_cut(graph: &Graph, source: &VertexId, sink: &VertexId) -> Result<MinCut> {
    max_flow(graph, source, sink).map(|flow| flow.cut)
}
