//! Interchange format abstraction implemented by the provider crates.

use std::io::{Read, Write};

use crate::graph::Graph;

/// A serialized representation that graphs can be read from and written to.
///
/// Implementations must round-trip: writing a graph and reading it back
/// yields the same ids, endpoints, weights, attributes and directedness.
///
/// # Examples
/// ```
/// use std::io::{Read, Write};
/// use grafo_core::{Attributes, Graph, GraphFormat};
///
/// /// One vertex name per line, no edges.
/// struct Lines;
///
/// impl GraphFormat for Lines {
///     type Error = std::io::Error;
///
///     fn name(&self) -> &str { "lines" }
///
///     fn read(&self, reader: &mut dyn Read) -> Result<Graph, Self::Error> {
///         let mut text = String::new();
///         reader.read_to_string(&mut text)?;
///         let mut graph = Graph::undirected("lines");
///         for line in text.lines() {
///             graph
///                 .add_vertex(line, Attributes::new())
///                 .map_err(std::io::Error::other)?;
///         }
///         Ok(graph)
///     }
///
///     fn write(&self, graph: &Graph, writer: &mut dyn Write) -> Result<(), Self::Error> {
///         for vertex in graph.vertices() {
///             writeln!(writer, "{vertex}")?;
///         }
///         Ok(())
///     }
/// }
///
/// let graph = Lines.parse("a\nb\n")?;
/// assert_eq!(graph.vertex_count(), 2);
/// assert_eq!(Lines.render(&graph)?, "a\nb\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub trait GraphFormat {
    /// Error produced while reading or writing.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short human-readable name of the format.
    fn name(&self) -> &str;

    /// Reads one graph from `reader`.
    ///
    /// # Errors
    /// Returns the format's error when the input is malformed or describes an
    /// invalid graph.
    fn read(&self, reader: &mut dyn Read) -> Result<Graph, Self::Error>;

    /// Writes `graph` to `writer`.
    ///
    /// # Errors
    /// Returns the format's error when writing fails.
    fn write(&self, graph: &Graph, writer: &mut dyn Write) -> Result<(), Self::Error>;

    /// Reads a graph from an in-memory string.
    ///
    /// # Errors
    /// As [`GraphFormat::read`].
    fn parse(&self, text: &str) -> Result<Graph, Self::Error> {
        self.read(&mut text.as_bytes())
    }

    /// Writes a graph to an in-memory string.
    ///
    /// # Errors
    /// As [`GraphFormat::write`].
    fn render(&self, graph: &Graph) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        self.write(graph, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
