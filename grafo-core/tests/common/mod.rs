use grafo_core::{Attributes, Graph, VertexId};
use grafo_test_support::fixtures::GraphFixture;

fn vertex(index: usize) -> VertexId {
    VertexId::Int(i64::try_from(index).expect("fixture index fits in i64"))
}

/// Materialises a fixture through the public graph API.
#[must_use]
pub fn build(fixture: &GraphFixture, directed: bool) -> Graph {
    let mut graph = if directed {
        Graph::directed(fixture.name.clone())
    } else {
        Graph::undirected(fixture.name.clone())
    };
    for index in 0..fixture.vertex_count {
        graph
            .add_vertex(vertex(index), Attributes::new())
            .expect("fixture ids are unique");
    }
    for &(s, t, weight) in &fixture.edges {
        graph
            .add_edge(vertex(s), vertex(t), weight, Attributes::new())
            .expect("fixture edges are valid");
    }
    graph
}
