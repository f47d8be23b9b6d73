//! Serializable results of registry invocations.

use serde::Serialize;

use crate::{
    centrality::{CentralityScores, EdgeScore},
    coloring::{ChromaticEstimate, Coloring, EdgeColoring},
    community::{CommunityDetection, Partition},
    cycles::EulerianKind,
    flow::{MaxFlow, MinCut},
    graph::VertexId,
    isomorphism::VertexMapping,
    matching::{Bipartition, Matching},
    planarity::{GenusEstimate, Planarity},
    shortest_path::{DistanceMatrix, Path, ShortestPaths},
    spanning_tree::SpanningTree,
    topological::CriticalPath,
    tsp::{Tour, TspComparison},
};

/// Result of any registered algorithm.
///
/// Serializes as `{"kind": "...", "result": ...}` with the kind in snake
/// case. Absent optional answers (no isomorphism, no Hamiltonian cycle, not
/// `k`-colourable) serialize as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
#[non_exhaustive]
pub enum AlgorithmOutput {
    /// A score per vertex.
    Scores(CentralityScores),
    /// A score per edge.
    EdgeScores(Vec<EdgeScore>),
    /// A vertex colouring.
    Coloring(Coloring),
    /// A proper edge colouring.
    EdgeColoring(EdgeColoring),
    /// Bounds on the chromatic number.
    ChromaticEstimate(ChromaticEstimate),
    /// A `k`-colouring, or `None` when none exists.
    Colorability(Option<Coloring>),
    /// Detected communities with their quality.
    Communities(CommunityDetection),
    /// A bare partition.
    Partition(Partition),
    /// A single real number.
    Number(f64),
    /// A single count.
    Count(usize),
    /// A yes/no answer.
    Flag(bool),
    /// Eigenvalues in ascending order.
    Spectrum(Vec<f64>),
    /// A maximum flow.
    MaxFlow(MaxFlow),
    /// A minimum cut.
    MinCut(MinCut),
    /// A maximum matching.
    Matching(Matching),
    /// A two-colouring of the vertices.
    Bipartition(Bipartition),
    /// One vertex mapping, or `None`.
    Mapping(Option<VertexMapping>),
    /// Several vertex mappings.
    Mappings(Vec<VertexMapping>),
    /// Planarity verdict with its certificate.
    Planarity(Planarity),
    /// Genus bounds.
    Genus(GenusEstimate),
    /// A closed tour.
    Tour(Tour),
    /// Side-by-side TSP methods.
    TspComparison(TspComparison),
    /// Eulerian classification.
    EulerianKind(EulerianKind),
    /// A walk or order over vertices.
    Vertices(Vec<VertexId>),
    /// A closed cycle, or `None`.
    Cycle(Option<Vec<VertexId>>),
    /// A list of vertex sets.
    VertexSets(Vec<Vec<VertexId>>),
    /// The longest chain of tasks.
    CriticalPath(CriticalPath),
    /// Single-source distances with a predecessor tree.
    ShortestPaths(ShortestPaths),
    /// One shortest path.
    Path(Path),
    /// All-pairs distances.
    DistanceMatrix(DistanceMatrix),
    /// A minimum spanning tree.
    SpanningTree(SpanningTree),
}

impl AlgorithmOutput {
    /// Stable name of the variant, as written to the `kind` field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scores(_) => "scores",
            Self::EdgeScores(_) => "edge_scores",
            Self::Coloring(_) => "coloring",
            Self::EdgeColoring(_) => "edge_coloring",
            Self::ChromaticEstimate(_) => "chromatic_estimate",
            Self::Colorability(_) => "colorability",
            Self::Communities(_) => "communities",
            Self::Partition(_) => "partition",
            Self::Number(_) => "number",
            Self::Count(_) => "count",
            Self::Flag(_) => "flag",
            Self::Spectrum(_) => "spectrum",
            Self::MaxFlow(_) => "max_flow",
            Self::MinCut(_) => "min_cut",
            Self::Matching(_) => "matching",
            Self::Bipartition(_) => "bipartition",
            Self::Mapping(_) => "mapping",
            Self::Mappings(_) => "mappings",
            Self::Planarity(_) => "planarity",
            Self::Genus(_) => "genus",
            Self::Tour(_) => "tour",
            Self::TspComparison(_) => "tsp_comparison",
            Self::EulerianKind(_) => "eulerian_kind",
            Self::Vertices(_) => "vertices",
            Self::Cycle(_) => "cycle",
            Self::VertexSets(_) => "vertex_sets",
            Self::CriticalPath(_) => "critical_path",
            Self::ShortestPaths(_) => "shortest_paths",
            Self::Path(_) => "path",
            Self::DistanceMatrix(_) => "distance_matrix",
            Self::SpanningTree(_) => "spanning_tree",
        }
    }
}
