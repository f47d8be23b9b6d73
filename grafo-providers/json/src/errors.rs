use std::path::PathBuf;

use grafo_core::GraphError;
use thiserror::Error;

/// Errors raised while reading or writing JSON graph documents.
#[derive(Debug, Error)]
pub enum JsonGraphError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("malformed graph document: {0}")]
    Json(#[from] serde_json::Error),
    /// The document describes a graph the model rejects.
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),
    /// A file could not be opened or created.
    #[error("cannot access `{path}`: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl JsonGraphError {
    /// Stable machine-readable code for logs and exit reports.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Json(_) => "JSON_MALFORMED_DOCUMENT",
            Self::Graph(err) => err.code().as_str(),
            Self::Io { .. } => "JSON_IO",
        }
    }
}
