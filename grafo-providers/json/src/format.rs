//! [`GraphFormat`] implementation.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use grafo_core::{Graph, GraphFormat};
use tracing::{debug, instrument};

use crate::{document::GraphDocument, errors::JsonGraphError};

const FALLBACK_NAME: &str = "grafo";

/// Reads and writes graphs as JSON documents.
///
/// # Examples
/// ```
/// use grafo_core::GraphFormat;
/// use grafo_providers_json::JsonFormat;
///
/// let graph = JsonFormat::new().parse(
///     r#"{"nome": "pair", "arestas": [{"origem": 1, "destino": 2, "peso": 4.0}]}"#,
/// )?;
/// assert_eq!(graph.name(), "pair");
/// assert_eq!(graph.edge_count(), 1);
/// assert!(!graph.is_directed());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    /// Creates a format writing compact JSON.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Switches indented output on or off.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns `true` when output is indented.
    #[must_use]
    #[rustfmt::skip]
    pub const fn pretty(&self) -> bool { self.pretty }

    /// Loads a graph from a file.
    ///
    /// A document without `nome` is named after the file stem.
    ///
    /// # Errors
    /// Returns [`JsonGraphError::Io`] when the file cannot be opened and the
    /// errors of [`GraphFormat::read`] otherwise.
    #[instrument(
        name = "json.load",
        level = "debug",
        err,
        skip(self, path),
        fields(path = %path.as_ref().display())
    )]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Graph, JsonGraphError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| JsonGraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fallback = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(FALLBACK_NAME);
        read_document(&mut BufReader::new(file), fallback)
    }

    /// Writes a graph to a file, replacing any existing content.
    ///
    /// # Errors
    /// Returns [`JsonGraphError::Io`] when the file cannot be created or
    /// flushed.
    #[instrument(
        name = "json.save",
        level = "debug",
        err,
        skip(self, graph, path),
        fields(path = %path.as_ref().display())
    )]
    pub fn save(&self, graph: &Graph, path: impl AsRef<Path>) -> Result<(), JsonGraphError> {
        let path = path.as_ref();
        let io_error = |source| JsonGraphError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        self.write(graph, &mut writer)?;
        writer.flush().map_err(io_error)
    }
}

impl GraphFormat for JsonFormat {
    type Error = JsonGraphError;

    fn name(&self) -> &str {
        "json"
    }

    fn read(&self, reader: &mut dyn Read) -> Result<Graph, Self::Error> {
        read_document(reader, FALLBACK_NAME)
    }

    #[instrument(
        name = "json.write",
        level = "debug",
        err,
        skip_all,
        fields(graph = %graph.name())
    )]
    fn write(&self, graph: &Graph, writer: &mut dyn Write) -> Result<(), Self::Error> {
        let document = GraphDocument::from_graph(graph)?;
        if self.pretty {
            serde_json::to_writer_pretty(writer, &document)?;
        } else {
            serde_json::to_writer(writer, &document)?;
        }
        Ok(())
    }
}

#[instrument(name = "json.read", level = "debug", err, skip(reader))]
fn read_document(reader: &mut dyn Read, fallback_name: &str) -> Result<Graph, JsonGraphError> {
    let document: GraphDocument = serde_json::from_reader(reader)?;
    debug!(
        vertices = document.vertices.len(),
        edges = document.arestas.len(),
        directed = document.direcionado,
        "parsed graph document"
    );
    Ok(document.into_graph(fallback_name)?)
}
