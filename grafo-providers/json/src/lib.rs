//! JSON interchange for grafo graphs.
//!
//! Documents use the field names of the legacy exporter:
//!
//! ```json
//! {
//!   "nome": "roads",
//!   "direcionado": false,
//!   "ponderado": true,
//!   "vertices": [{"id": "a", "atributos": {"city": "Lisbon"}}],
//!   "arestas": [{"origem": "a", "destino": "b", "peso": 3.5, "atributos": {}}]
//! }
//! ```

mod document;
mod errors;
mod format;

pub use errors::JsonGraphError;
pub use format::JsonFormat;
