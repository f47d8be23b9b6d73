//! Benchmark setup error type.

use grafo_core::{AlgorithmError, GraphError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The synthetic graph could not be assembled.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
    /// An algorithm rejected the prepared input.
    #[error("algorithm failed during setup: {0}")]
    Algorithm(#[from] AlgorithmError),
    /// A generator parameter is out of range.
    #[error("invalid generator parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Offending parameter.
        name: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}
