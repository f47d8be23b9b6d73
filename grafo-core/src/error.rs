//! Error types for the grafo core library.
//!
//! Graph mutations fail with [`GraphError`]; algorithm invocations fail with
//! [`AlgorithmError`]. Every variant carries a stable machine-readable code and
//! belongs to exactly one [`ErrorKind`] so callers can tell "computed an empty
//! result" apart from "failed to compute".

use std::{fmt, sync::Arc};

use serde::Serialize;
use thiserror::Error;

use crate::graph::VertexId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr, $kind:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }

            /// Return the taxonomy bucket this code belongs to.
            #[must_use]
            pub const fn kind(self) -> ErrorKind {
                match self {
                    $(Self::$CodeVariant => ErrorKind::$kind,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }

            /// Return the taxonomy bucket of this error.
            #[must_use]
            pub const fn kind(&self) -> ErrorKind {
                self.code().kind()
            }
        }
    };
}

/// Coarse classification shared by every error in the crate.
///
/// # Examples
/// ```
/// use grafo_core::{ErrorKind, GraphError, VertexId};
///
/// let err = GraphError::VertexNotFound { vertex: VertexId::from("a") };
/// assert_eq!(err.kind(), ErrorKind::Structural);
/// assert_eq!(err.kind().as_str(), "structural");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// The graph is malformed for the requested operation.
    Structural,
    /// Numeric input or iteration failed (non-convergence, bad capacity).
    Numeric,
    /// A search budget, deadline or iteration cap was exhausted.
    ResourceLimit,
    /// The algorithm does not support this graph variant.
    UnsupportedOperation,
    /// Algorithm selection or parameters were invalid.
    Configuration,
}

impl ErrorKind {
    /// Returns the snake-case name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Numeric => "numeric",
            Self::ResourceLimit => "resource_limit",
            Self::UnsupportedOperation => "unsupported_operation",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced while mutating a [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// The referenced vertex is not part of the graph.
    #[error("vertex `{vertex}` does not exist")]
    VertexNotFound {
        /// Identifier that failed to resolve.
        vertex: VertexId,
    },
    /// A vertex with the same identifier already exists.
    #[error("vertex `{vertex}` already exists")]
    DuplicateVertex {
        /// Identifier that was inserted twice.
        vertex: VertexId,
    },
    /// The edge cannot be inserted.
    #[error("invalid edge `{from}` -> `{to}`: {reason}")]
    InvalidEdge {
        /// Source endpoint of the rejected edge.
        from: VertexId,
        /// Target endpoint of the rejected edge.
        to: VertexId,
        /// Human-readable explanation.
        reason: Arc<str>,
    },
    /// The referenced edge is not part of the graph.
    #[error("edge `{from}` -> `{to}` does not exist")]
    EdgeNotFound {
        /// Source endpoint of the missing edge.
        from: VertexId,
        /// Target endpoint of the missing edge.
        to: VertexId,
    },
    /// An attribute mapping tried to use the key reserved for edge weights.
    #[error("attribute key `{key}` is reserved")]
    ReservedAttribute {
        /// The reserved key.
        key: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The referenced vertex is not part of the graph.
        VertexNotFound => VertexNotFound { .. } => "GRAPH_VERTEX_NOT_FOUND", Structural,
        /// A vertex with the same identifier already exists.
        DuplicateVertex => DuplicateVertex { .. } => "GRAPH_DUPLICATE_VERTEX", Structural,
        /// The edge cannot be inserted.
        InvalidEdge => InvalidEdge { .. } => "GRAPH_INVALID_EDGE", Structural,
        /// The referenced edge is not part of the graph.
        EdgeNotFound => EdgeNotFound { .. } => "GRAPH_EDGE_NOT_FOUND", Structural,
        /// An attribute mapping used the reserved weight key.
        ReservedAttribute => ReservedAttribute { .. } => "GRAPH_RESERVED_ATTRIBUTE", Structural,
    }
}

/// An error produced by an algorithm invocation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AlgorithmError {
    /// A vertex named by the caller is not part of the graph.
    #[error("vertex `{vertex}` does not exist")]
    VertexNotFound {
        /// Identifier that failed to resolve.
        vertex: VertexId,
    },
    /// The graph is empty but the algorithm needs at least one vertex.
    #[error("{algorithm} requires a non-empty graph")]
    EmptyGraph {
        /// Algorithm that rejected the graph.
        algorithm: &'static str,
    },
    /// The algorithm does not support directed graphs.
    #[error("{algorithm} does not support directed graphs")]
    DirectedUnsupported {
        /// Algorithm that rejected the graph.
        algorithm: &'static str,
    },
    /// The algorithm requires a directed graph.
    #[error("{algorithm} requires a directed graph")]
    UndirectedUnsupported {
        /// Algorithm that rejected the graph.
        algorithm: &'static str,
    },
    /// A 2-colouring of the graph failed at the given vertex.
    #[error("graph is not bipartite: odd cycle detected at vertex `{vertex}`")]
    NotBipartite {
        /// Vertex where the colouring conflict was detected.
        vertex: VertexId,
    },
    /// A declared bipartition is invalid.
    #[error("invalid bipartition at vertex `{vertex}`: {reason}")]
    InvalidBipartition {
        /// Offending vertex.
        vertex: VertexId,
        /// Human-readable explanation.
        reason: Arc<str>,
    },
    /// The graph has no Eulerian circuit or path.
    #[error("graph is not Eulerian at vertex `{vertex}`: {reason}")]
    NotEulerian {
        /// Offending vertex.
        vertex: VertexId,
        /// Human-readable explanation.
        reason: Arc<str>,
    },
    /// The algorithm requires a connected graph.
    #[error("{algorithm} requires a connected graph; vertex `{vertex}` is unreachable")]
    Disconnected {
        /// Algorithm that rejected the graph.
        algorithm: &'static str,
        /// A vertex outside the first component.
        vertex: VertexId,
    },
    /// No path leads from one vertex to the other.
    #[error("no path from `{from}` to `{to}`")]
    NoPath {
        /// Start of the requested path.
        from: VertexId,
        /// Unreachable end of the requested path.
        to: VertexId,
    },
    /// Shortest distances are undefined because of a negative cycle.
    #[error("graph has a negative cycle through `{vertex}`")]
    NegativeCycle {
        /// A vertex on the cycle.
        vertex: VertexId,
    },
    /// The algorithm requires a complete graph.
    #[error("graph is not complete: edge `{from}` -- `{to}` is missing")]
    NotComplete {
        /// First endpoint of the missing edge.
        from: VertexId,
        /// Second endpoint of the missing edge.
        to: VertexId,
    },
    /// Edge weights violate the triangle inequality.
    #[error("weights violate the triangle inequality on `{a}`, `{b}`, `{c}`")]
    NonMetric {
        /// First vertex of the violating triple.
        a: VertexId,
        /// Second vertex of the violating triple.
        b: VertexId,
        /// Third vertex of the violating triple.
        c: VertexId,
    },
    /// A directed cycle prevents a topological ordering.
    #[error("graph contains a cycle through vertex `{vertex}`")]
    CycleDetected {
        /// A vertex on, or downstream of, the cycle.
        vertex: VertexId,
    },
    /// A self-loop makes the requested structure impossible.
    #[error("{algorithm} does not accept the self-loop on vertex `{vertex}`")]
    SelfLoop {
        /// Algorithm that rejected the graph.
        algorithm: &'static str,
        /// Vertex carrying the loop.
        vertex: VertexId,
    },
    /// A mapping supplied by the caller is not a valid answer.
    #[error("invalid {what} at vertex `{vertex}`: {reason}")]
    InvalidSolution {
        /// Which solution was checked, e.g. "topological order".
        what: &'static str,
        /// Offending vertex.
        vertex: VertexId,
        /// Human-readable explanation.
        reason: Arc<str>,
    },
    /// An iterative method hit its cap before converging.
    #[error("{algorithm} did not converge within {iterations} iterations")]
    ConvergenceFailure {
        /// Algorithm that failed to converge.
        algorithm: &'static str,
        /// Iteration cap that was exhausted.
        iterations: usize,
    },
    /// An edge capacity is negative or not finite.
    #[error("edge `{from}` -> `{to}` has invalid capacity {capacity}")]
    InvalidCapacity {
        /// Source endpoint.
        from: VertexId,
        /// Target endpoint.
        to: VertexId,
        /// The rejected capacity.
        capacity: f64,
    },
    /// An edge weight is negative where the algorithm forbids it.
    #[error("{algorithm} does not accept the negative weight {weight} on `{from}` -- `{to}`")]
    NegativeWeight {
        /// Algorithm that rejected the weight.
        algorithm: &'static str,
        /// Source endpoint.
        from: VertexId,
        /// Target endpoint.
        to: VertexId,
        /// The rejected weight.
        weight: f64,
    },
    /// A vertex attribute required by the algorithm is malformed.
    #[error("vertex `{vertex}` attribute `{key}` is invalid: {reason}")]
    InvalidAttribute {
        /// Vertex carrying the attribute.
        vertex: VertexId,
        /// Attribute key.
        key: Arc<str>,
        /// Human-readable explanation.
        reason: Arc<str>,
    },
    /// The node budget of an exponential search was exhausted.
    #[error("{algorithm} exceeded its search budget after {explored} nodes")]
    SearchBudgetExceeded {
        /// Algorithm that was cut off.
        algorithm: &'static str,
        /// Number of search nodes expanded before stopping.
        explored: u64,
    },
    /// The deadline of an exponential search expired.
    #[error("{algorithm} exceeded its deadline after {elapsed_ms} ms")]
    DeadlineExceeded {
        /// Algorithm that was cut off.
        algorithm: &'static str,
        /// Wall time spent before stopping.
        elapsed_ms: u128,
    },
    /// No algorithm is registered under the requested name.
    #[error("unknown algorithm `{name}`")]
    UnknownAlgorithm {
        /// Name requested by the caller.
        name: Arc<str>,
    },
    /// A required parameter was not supplied.
    #[error("{algorithm} requires parameter `{name}`")]
    MissingParameter {
        /// Algorithm that needed the parameter.
        algorithm: &'static str,
        /// Parameter name.
        name: &'static str,
    },
    /// A parameter could not be interpreted.
    #[error("parameter `{name}` is invalid: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: Arc<str>,
        /// Human-readable explanation.
        reason: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`AlgorithmError`] variants.
    enum AlgorithmErrorCode for AlgorithmError {
        /// A vertex named by the caller is not part of the graph.
        VertexNotFound => VertexNotFound { .. } => "ALGORITHM_VERTEX_NOT_FOUND", Structural,
        /// The graph is empty.
        EmptyGraph => EmptyGraph { .. } => "ALGORITHM_EMPTY_GRAPH", Structural,
        /// Directed graphs are not supported.
        DirectedUnsupported => DirectedUnsupported { .. } => "ALGORITHM_DIRECTED_UNSUPPORTED", UnsupportedOperation,
        /// Undirected graphs are not supported.
        UndirectedUnsupported => UndirectedUnsupported { .. } => "ALGORITHM_UNDIRECTED_UNSUPPORTED", UnsupportedOperation,
        /// The graph is not bipartite.
        NotBipartite => NotBipartite { .. } => "ALGORITHM_NOT_BIPARTITE", Structural,
        /// The declared bipartition is invalid.
        InvalidBipartition => InvalidBipartition { .. } => "ALGORITHM_INVALID_BIPARTITION", Structural,
        /// The graph is not Eulerian.
        NotEulerian => NotEulerian { .. } => "ALGORITHM_NOT_EULERIAN", Structural,
        /// The graph is disconnected.
        Disconnected => Disconnected { .. } => "ALGORITHM_DISCONNECTED", Structural,
        /// The requested path does not exist.
        NoPath => NoPath { .. } => "ALGORITHM_NO_PATH", Structural,
        /// Distances are undefined because of a negative cycle.
        NegativeCycle => NegativeCycle { .. } => "ALGORITHM_NEGATIVE_CYCLE", Structural,
        /// The graph is not complete.
        NotComplete => NotComplete { .. } => "ALGORITHM_NOT_COMPLETE", Structural,
        /// The weights violate the triangle inequality.
        NonMetric => NonMetric { .. } => "ALGORITHM_NON_METRIC", Structural,
        /// The graph contains a directed cycle.
        CycleDetected => CycleDetected { .. } => "ALGORITHM_CYCLE_DETECTED", Structural,
        /// A self-loop was rejected.
        SelfLoop => SelfLoop { .. } => "ALGORITHM_SELF_LOOP", Structural,
        /// A caller-supplied solution was invalid.
        InvalidSolution => InvalidSolution { .. } => "ALGORITHM_INVALID_SOLUTION", Structural,
        /// An iterative method failed to converge.
        ConvergenceFailure => ConvergenceFailure { .. } => "ALGORITHM_CONVERGENCE_FAILURE", Numeric,
        /// An edge capacity was invalid.
        InvalidCapacity => InvalidCapacity { .. } => "ALGORITHM_INVALID_CAPACITY", Numeric,
        /// A negative weight was rejected.
        NegativeWeight => NegativeWeight { .. } => "ALGORITHM_NEGATIVE_WEIGHT", Numeric,
        /// A vertex attribute was malformed.
        InvalidAttribute => InvalidAttribute { .. } => "ALGORITHM_INVALID_ATTRIBUTE", Numeric,
        /// The search budget was exhausted.
        SearchBudgetExceeded => SearchBudgetExceeded { .. } => "ALGORITHM_SEARCH_BUDGET_EXCEEDED", ResourceLimit,
        /// The search deadline expired.
        DeadlineExceeded => DeadlineExceeded { .. } => "ALGORITHM_DEADLINE_EXCEEDED", ResourceLimit,
        /// The algorithm name is unknown.
        UnknownAlgorithm => UnknownAlgorithm { .. } => "ALGORITHM_UNKNOWN", Configuration,
        /// A required parameter was missing.
        MissingParameter => MissingParameter { .. } => "ALGORITHM_MISSING_PARAMETER", Configuration,
        /// A parameter was malformed.
        InvalidParameter => InvalidParameter { .. } => "ALGORITHM_INVALID_PARAMETER", Configuration,
    }
}

impl AlgorithmError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<Arc<str>>) -> Self {
        Self::InvalidParameter {
            name: Arc::from(name),
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by graph mutations.
pub type GraphResult<T> = core::result::Result<T, GraphError>;

/// Convenient alias for results returned by algorithms.
pub type Result<T> = core::result::Result<T, AlgorithmError>;
