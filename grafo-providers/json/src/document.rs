//! Serde mirror of the on-disk document.

use grafo_core::{
    AttributeValue, Attributes, Graph, GraphError, GraphResult, VertexId, WEIGHT_KEY,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_WEIGHT: f64 = 1.0;

const fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct GraphDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) nome: Option<String>,
    #[serde(default)]
    pub(crate) direcionado: bool,
    #[serde(default = "default_true")]
    pub(crate) ponderado: bool,
    #[serde(default)]
    pub(crate) vertices: Vec<VertexDocument>,
    #[serde(default)]
    pub(crate) arestas: Vec<EdgeDocument>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct VertexDocument {
    pub(crate) id: VertexId,
    #[serde(default)]
    pub(crate) atributos: Attributes,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct EdgeDocument {
    pub(crate) origem: VertexId,
    pub(crate) destino: VertexId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) peso: Option<f64>,
    #[serde(default)]
    pub(crate) atributos: Attributes,
}

impl GraphDocument {
    pub(crate) fn from_graph(graph: &Graph) -> GraphResult<Self> {
        let vertices = graph
            .vertices()
            .map(|id| {
                Ok(VertexDocument {
                    id: id.clone(),
                    atributos: graph.vertex_attributes(id)?.clone(),
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;
        let arestas = graph
            .edges()
            .map(|edge| EdgeDocument {
                origem: edge.source().clone(),
                destino: edge.target().clone(),
                peso: Some(edge.weight()),
                atributos: edge.attributes().clone(),
            })
            .collect();
        Ok(Self {
            nome: Some(graph.name().to_owned()),
            direcionado: graph.is_directed(),
            ponderado: graph.is_weighted(),
            vertices,
            arestas,
        })
    }

    /// Builds the graph, naming it `fallback_name` when the document has no
    /// `nome`.
    ///
    /// Endpoints that only appear in `arestas` become vertices without
    /// attributes.
    pub(crate) fn into_graph(self, fallback_name: &str) -> GraphResult<Graph> {
        let name = self.nome.unwrap_or_else(|| fallback_name.to_owned());
        let mut graph = if self.direcionado {
            Graph::directed(name)
        } else {
            Graph::undirected(name)
        };
        for VertexDocument { id, mut atributos } in self.vertices {
            if atributos.remove(WEIGHT_KEY).is_some() {
                debug!(vertex = %id, "dropped reserved `weight` vertex attribute");
            }
            graph.add_vertex(id, atributos)?;
        }
        for edge in self.arestas {
            let EdgeDocument {
                origem,
                destino,
                peso,
                mut atributos,
            } = edge;
            let embedded = atributos.remove(WEIGHT_KEY);
            let weight = match (peso, embedded) {
                (Some(weight), _) => weight,
                (None, Some(value)) => weight_from_attribute(&origem, &destino, &value)?,
                (None, None) => DEFAULT_WEIGHT,
            };
            for endpoint in [&origem, &destino] {
                if !graph.contains_vertex(endpoint) {
                    graph.add_vertex(endpoint.clone(), Attributes::new())?;
                }
            }
            graph.add_edge(origem, destino, weight, atributos)?;
        }
        if self.ponderado {
            Ok(graph)
        } else {
            graph.into_unweighted()
        }
    }
}

fn weight_from_attribute(
    origem: &VertexId,
    destino: &VertexId,
    value: &AttributeValue,
) -> GraphResult<f64> {
    value.as_f64().ok_or_else(|| GraphError::InvalidEdge {
        from: origem.clone(),
        to: destino.clone(),
        reason: format!("`weight` attribute `{value}` is not numeric").into(),
    })
}
