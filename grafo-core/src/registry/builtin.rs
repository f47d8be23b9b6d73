//! Registry entries for every algorithm shipped with the crate.
#![expect(
    clippy::unnecessary_wraps,
    reason = "every entry has the registry's fallible signature"
)]

use indexmap::IndexMap;

use super::{AlgorithmConfig, AlgorithmOutput, AlgorithmSpec, config::required};
use crate::{
    centrality::{self, KatzConfig, PageRankConfig},
    cliques,
    coloring::{self, ColoringStrategy},
    community::{self, LouvainConfig, Partition},
    convergence::IterationControl,
    cycles,
    error::{AlgorithmError, Result},
    flow,
    graph::{Graph, VertexId},
    isomorphism,
    matching::{self, Bipartition},
    planarity,
    shortest_path,
    spanning_tree::{self, SpanningTreeMethod},
    spectral::{self, SpectralConfig},
    topological,
    tsp::{self, GeneticConfig},
};

macro_rules! entry {
    ($name:literal, $family:literal, $summary:literal, $run:path) => {
        AlgorithmSpec {
            name: $name,
            family: $family,
            summary: $summary,
            run: $run,
        }
    };
}

/// Every built-in entry, grouped by family.
#[rustfmt::skip]
pub(super) fn all() -> Vec<AlgorithmSpec> {
    vec![
        entry!("degree_centrality", "centrality", "degree divided by n - 1", degree),
        entry!("betweenness_centrality", "centrality", "shortest-path betweenness [normalized]", betweenness),
        entry!("edge_betweenness_centrality", "centrality", "betweenness per edge [normalized]", edge_betweenness),
        entry!("closeness_centrality", "centrality", "reciprocal mean distance", closeness),
        entry!("harmonic_centrality", "centrality", "sum of reciprocal distances", harmonic),
        entry!("eigenvector_centrality", "centrality", "power iteration [max_iterations, tolerance]", eigenvector),
        entry!("pagerank", "centrality", "PageRank [damping, max_iterations, tolerance]", pagerank),
        entry!("katz_centrality", "centrality", "Katz [alpha, beta, max_iterations, tolerance]", katz),
        entry!("coloring", "coloring", "vertex colouring [strategy]", color),
        entry!("edge_coloring", "coloring", "proper edge colouring", edge_color),
        entry!("chromatic_number", "coloring", "chromatic number bounds", chromatic),
        entry!("k_colorable", "coloring", "exact k-colouring search (k, max_nodes, timeout_ms)", k_colorable),
        entry!("girvan_newman", "community", "edge-betweenness splitting [k]", girvan_newman),
        entry!("louvain", "community", "modularity optimisation [resolution, max_iterations, tolerance]", louvain),
        entry!("modularity", "community", "modularity of the partition in a vertex attribute [attribute, resolution]", modularity),
        entry!("laplacian_spectrum", "spectral", "Laplacian eigenvalues", laplacian_spectrum),
        entry!("normalized_laplacian_spectrum", "spectral", "normalized Laplacian eigenvalues", normalized_spectrum),
        entry!("adjacency_spectrum", "spectral", "adjacency eigenvalues", adjacency_spectrum),
        entry!("algebraic_connectivity", "spectral", "second-smallest Laplacian eigenvalue", algebraic_connectivity),
        entry!("spectral_energy", "spectral", "sum of absolute adjacency eigenvalues", energy),
        entry!("spectral_clustering", "spectral", "Laplacian embedding plus k-means (k) [kmeans_iterations]", spectral_clustering),
        entry!("spectral_communities", "spectral", "modularity-best spectral clustering [max_communities, kmeans_iterations]", spectral_communities),
        entry!("spectral_distance", "spectral", "Laplacian spectrum distance to the pattern graph", spectral_distance),
        entry!("max_flow", "flow", "Edmonds-Karp maximum flow (source, sink)", max_flow),
        entry!("min_cut", "flow", "minimum s-t cut (source, sink)", min_cut),
        entry!("hopcroft_karp", "matching", "maximum bipartite matching [side attribute]", hopcroft_karp),
        entry!("bipartition", "matching", "two-colouring of a bipartite graph", bipartition),
        entry!("subgraph_isomorphism", "isomorphism", "embed the pattern graph [max_nodes, timeout_ms]", subgraph_isomorphism),
        entry!("enumerate_subgraph_isomorphisms", "isomorphism", "every embedding of the pattern graph [limit, max_nodes, timeout_ms]", enumerate_isomorphisms),
        entry!("isomorphism", "isomorphism", "isomorphism with the pattern graph [max_nodes, timeout_ms]", isomorphism),
        entry!("planarity", "planarity", "planar embedding or Kuratowski witness", planarity),
        entry!("genus", "planarity", "genus bounds", genus),
        entry!("christofides", "tsp", "1.5-approximate metric tour", christofides),
        entry!("genetic_tsp", "tsp", "genetic tour [population, generations, mutation_rate, crossover_rate, tournament_size, seed]", genetic_tsp),
        entry!("nearest_neighbor_tsp", "tsp", "greedy tour [start]", nearest_neighbor_tsp),
        entry!("tsp_comparison", "tsp", "run every TSP method [genetic parameters]", tsp_comparison),
        entry!("eulerian_kind", "cycles", "circuit, path or none", eulerian_kind),
        entry!("eulerian_circuit", "cycles", "Hierholzer circuit [start]", eulerian_circuit),
        entry!("eulerian_path", "cycles", "Hierholzer path", eulerian_path),
        entry!("hamiltonian_cycle", "cycles", "backtracking search [max_nodes, timeout_ms]", hamiltonian_cycle),
        entry!("maximal_cliques", "cliques", "Bron-Kerbosch enumeration [max_nodes, timeout_ms]", maximal_cliques),
        entry!("maximum_clique", "cliques", "largest clique [max_nodes, timeout_ms]", maximum_clique),
        entry!("clique_number", "cliques", "size of the largest clique [max_nodes, timeout_ms]", clique_number),
        entry!("topological_sort", "topological", "Kahn order", topological_sort),
        entry!("is_dag", "topological", "acyclicity check", is_dag),
        entry!("critical_path", "topological", "longest chain of vertex durations [attribute]", critical_path),
        entry!("dijkstra", "paths", "single-source distances and predecessors (source)", dijkstra),
        entry!("shortest_path", "paths", "one shortest path (source, target)", shortest_path),
        entry!("floyd_warshall", "paths", "all-pairs distances with diameter and center", floyd_warshall),
        entry!("minimum_spanning_tree", "spanning_tree", "Kruskal or Prim tree [method, root]", minimum_spanning_tree),
    ]
}

fn normalized(config: &AlgorithmConfig) -> Result<bool> {
    Ok(config.bool("normalized")?.unwrap_or(true))
}

fn pattern<'a>(algorithm: &'static str, config: &'a AlgorithmConfig) -> Result<&'a Graph> {
    required(algorithm, "pattern", config.pattern())
}

fn degree(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::Scores(centrality::degree_centrality(graph)))
}

fn betweenness(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    centrality::betweenness_centrality(graph, normalized(config)?).map(AlgorithmOutput::Scores)
}

fn edge_betweenness(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    centrality::edge_betweenness_centrality(graph, normalized(config)?)
        .map(AlgorithmOutput::EdgeScores)
}

fn closeness(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    centrality::closeness_centrality(graph).map(AlgorithmOutput::Scores)
}

fn harmonic(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    centrality::harmonic_centrality(graph).map(AlgorithmOutput::Scores)
}

fn eigenvector(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let control = config.iteration_control(IterationControl::default())?;
    centrality::eigenvector_centrality(graph, control).map(AlgorithmOutput::Scores)
}

fn pagerank(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let defaults = PageRankConfig::default();
    let mut options = defaults.with_control(config.iteration_control(defaults.control())?);
    if let Some(damping) = config.f64("damping")? {
        options = options.with_damping(damping);
    }
    centrality::pagerank(graph, options).map(AlgorithmOutput::Scores)
}

fn katz(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let defaults = KatzConfig::default();
    let mut options = defaults.with_control(config.iteration_control(defaults.control())?);
    if let Some(alpha) = config.f64("alpha")? {
        options = options.with_alpha(alpha);
    }
    if let Some(beta) = config.f64("beta")? {
        options = options.with_beta(beta);
    }
    centrality::katz_centrality(graph, options).map(AlgorithmOutput::Scores)
}

fn color(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let strategy = config
        .string("strategy")?
        .map_or(Ok(ColoringStrategy::Greedy), str::parse::<ColoringStrategy>)?;
    coloring::color_graph(graph, strategy).map(AlgorithmOutput::Coloring)
}

fn edge_color(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::EdgeColoring(coloring::edge_coloring(graph)))
}

fn chromatic(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    coloring::chromatic_number_upper_bound(graph).map(AlgorithmOutput::ChromaticEstimate)
}

fn k_colorable(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let k = required("k_colorable", "k", config.usize("k")?)?;
    coloring::is_k_colorable(graph, k, config.search_budget()?).map(AlgorithmOutput::Colorability)
}

fn girvan_newman(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    community::girvan_newman(graph, config.usize("k")?).map(AlgorithmOutput::Communities)
}

fn louvain(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let defaults = LouvainConfig::default();
    let mut options = defaults.with_control(config.iteration_control(defaults.control())?);
    if let Some(resolution) = config.f64("resolution")? {
        options = options.with_resolution(resolution);
    }
    community::louvain(graph, options).map(AlgorithmOutput::Communities)
}

/// Groups vertices by the value of `attribute`, groups in first-seen order.
fn attribute_groups(graph: &Graph, attribute: &str) -> Result<Vec<Vec<VertexId>>> {
    let mut groups: IndexMap<String, Vec<VertexId>> = IndexMap::new();
    for vertex in graph.vertices() {
        let value = graph
            .vertex_attributes(vertex)
            .ok()
            .and_then(|attributes| attributes.get(attribute))
            .ok_or_else(|| AlgorithmError::InvalidAttribute {
                vertex: vertex.clone(),
                key: attribute.into(),
                reason: "missing".into(),
            })?;
        groups.entry(value.to_string()).or_default().push(vertex.clone());
    }
    Ok(groups.into_values().collect())
}

fn attribute_partition(graph: &Graph, attribute: &str) -> Result<Partition> {
    Partition::from_communities(graph, &attribute_groups(graph, attribute)?)
}

/// Reads a declared split from `attribute`: the first value seen marks the
/// left side, a second value the right side.
fn attribute_bipartition(graph: &Graph, attribute: &str) -> Result<Bipartition> {
    let mut groups = attribute_groups(graph, attribute)?.into_iter();
    let left = groups.next().unwrap_or_default();
    let right = groups.next().unwrap_or_default();
    if let Some(extra) = groups.next().and_then(|group| group.into_iter().next()) {
        return Err(AlgorithmError::InvalidAttribute {
            vertex: extra,
            key: attribute.into(),
            reason: "a bipartition takes exactly two side values".into(),
        });
    }
    Ok(Bipartition::new(left, right))
}

fn modularity(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let attribute = config.string("attribute")?.unwrap_or("community");
    let partition = attribute_partition(graph, attribute)?;
    let resolution = config.f64("resolution")?.unwrap_or(1.0);
    community::modularity_with_resolution(graph, &partition, resolution).map(AlgorithmOutput::Number)
}

fn laplacian_spectrum(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::Spectrum(spectral::laplacian_spectrum(graph)))
}

fn normalized_spectrum(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::Spectrum(spectral::normalized_laplacian_spectrum(graph)))
}

fn adjacency_spectrum(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::Spectrum(spectral::adjacency_spectrum(graph)))
}

fn algebraic_connectivity(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    spectral::algebraic_connectivity(graph).map(AlgorithmOutput::Number)
}

fn energy(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::Number(spectral::spectral_energy(graph)))
}

fn spectral_options(config: &AlgorithmConfig) -> Result<SpectralConfig> {
    let mut options = SpectralConfig::default();
    if let Some(iterations) = config.usize("kmeans_iterations")? {
        options = options.with_kmeans_iterations(iterations);
    }
    if let Some(max) = config.usize("max_communities")? {
        options = options.with_max_communities(max);
    }
    Ok(options)
}

fn spectral_clustering(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let k = required("spectral_clustering", "k", config.usize("k")?)?;
    spectral::spectral_clustering(graph, k, spectral_options(config)?).map(AlgorithmOutput::Partition)
}

fn spectral_communities(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    spectral::spectral_communities(graph, spectral_options(config)?).map(AlgorithmOutput::Communities)
}

fn spectral_distance(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let other = pattern("spectral_distance", config)?;
    Ok(AlgorithmOutput::Number(spectral::spectral_distance(graph, other)))
}

fn terminals(algorithm: &'static str, config: &AlgorithmConfig) -> Result<(VertexId, VertexId)> {
    Ok((
        required(algorithm, "source", config.vertex("source")?)?,
        required(algorithm, "sink", config.vertex("sink")?)?,
    ))
}

fn max_flow(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let (source, sink) = terminals("max_flow", config)?;
    flow::max_flow(graph, &source, &sink).map(AlgorithmOutput::MaxFlow)
}

fn min_cut(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let (source, sink) = terminals("min_cut", config)?;
    flow::min_cut(graph, &source, &sink).map(AlgorithmOutput::MinCut)
}

fn hopcroft_karp(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let sides = config
        .string("side")?
        .map(|attribute| attribute_bipartition(graph, attribute))
        .transpose()?;
    matching::hopcroft_karp(graph, sides.as_ref()).map(AlgorithmOutput::Matching)
}

fn bipartition(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    matching::bipartition(graph).map(AlgorithmOutput::Bipartition)
}

fn subgraph_isomorphism(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let pattern = pattern("subgraph_isomorphism", config)?;
    isomorphism::find_subgraph_isomorphism(pattern, graph, config.search_budget()?)
        .map(AlgorithmOutput::Mapping)
}

fn enumerate_isomorphisms(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let pattern = pattern("enumerate_subgraph_isomorphisms", config)?;
    isomorphism::enumerate_subgraph_isomorphisms(
        pattern,
        graph,
        config.usize("limit")?,
        config.search_budget()?,
    )
    .map(AlgorithmOutput::Mappings)
}

fn isomorphism(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let other = pattern("isomorphism", config)?;
    isomorphism::find_isomorphism(graph, other, config.search_budget()?).map(AlgorithmOutput::Mapping)
}

fn planarity(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::Planarity(planarity::check_planarity(graph)))
}

fn genus(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::Genus(planarity::genus_estimate(graph)))
}

fn christofides(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    tsp::christofides(graph).map(AlgorithmOutput::Tour)
}

fn genetic_options(config: &AlgorithmConfig) -> Result<GeneticConfig> {
    let mut options = GeneticConfig::default();
    if let Some(population) = config.usize("population")? {
        options = options.with_population(population);
    }
    if let Some(generations) = config.usize("generations")? {
        options = options.with_generations(generations);
    }
    if let Some(rate) = config.f64("mutation_rate")? {
        options = options.with_mutation_rate(rate);
    }
    if let Some(rate) = config.f64("crossover_rate")? {
        options = options.with_crossover_rate(rate);
    }
    if let Some(size) = config.usize("tournament_size")? {
        options = options.with_tournament_size(size);
    }
    if let Some(seed) = config.u64("seed")? {
        options = options.with_seed(seed);
    }
    Ok(options)
}

fn genetic_tsp(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    tsp::genetic_tour(graph, genetic_options(config)?).map(AlgorithmOutput::Tour)
}

fn nearest_neighbor_tsp(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let start = config.vertex("start")?;
    tsp::nearest_neighbor_tour(graph, start.as_ref()).map(AlgorithmOutput::Tour)
}

fn tsp_comparison(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::TspComparison(tsp::compare_tsp_methods(
        graph,
        genetic_options(config)?,
    )))
}

fn eulerian_kind(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    Ok(AlgorithmOutput::EulerianKind(cycles::eulerian_kind(graph)))
}

fn eulerian_circuit(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let start = config.vertex("start")?;
    cycles::eulerian_circuit(graph, start.as_ref()).map(AlgorithmOutput::Vertices)
}

fn eulerian_path(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    cycles::eulerian_path(graph).map(AlgorithmOutput::Vertices)
}

fn hamiltonian_cycle(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    cycles::hamiltonian_cycle(graph, config.search_budget()?).map(AlgorithmOutput::Cycle)
}

fn maximal_cliques(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    cliques::maximal_cliques(graph, config.search_budget()?).map(AlgorithmOutput::VertexSets)
}

fn maximum_clique(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    cliques::maximum_clique(graph, config.search_budget()?).map(AlgorithmOutput::Vertices)
}

fn clique_number(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    cliques::clique_number(graph, config.search_budget()?).map(AlgorithmOutput::Count)
}

fn topological_sort(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    topological::topological_sort(graph).map(AlgorithmOutput::Vertices)
}

fn is_dag(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    topological::is_dag(graph).map(AlgorithmOutput::Flag)
}

fn critical_path(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let key = config
        .string("attribute")?
        .unwrap_or(topological::DURATION_KEY);
    topological::critical_path(graph, key).map(AlgorithmOutput::CriticalPath)
}

fn dijkstra(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let source = required("dijkstra", "source", config.vertex("source")?)?;
    shortest_path::dijkstra(graph, &source).map(AlgorithmOutput::ShortestPaths)
}

fn shortest_path(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let source = required("shortest_path", "source", config.vertex("source")?)?;
    let target = required("shortest_path", "target", config.vertex("target")?)?;
    shortest_path::shortest_path(graph, &source, &target).map(AlgorithmOutput::Path)
}

fn floyd_warshall(graph: &Graph, _: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    shortest_path::floyd_warshall(graph).map(AlgorithmOutput::DistanceMatrix)
}

fn minimum_spanning_tree(graph: &Graph, config: &AlgorithmConfig) -> Result<AlgorithmOutput> {
    let method = config
        .string("method")?
        .map(str::parse::<SpanningTreeMethod>)
        .transpose()?
        .unwrap_or_default();
    let root = config.vertex("root")?;
    let tree = match (method, root) {
        (SpanningTreeMethod::Prim, Some(root)) => spanning_tree::prim(graph, Some(&root)),
        (method, _) => spanning_tree::minimum_spanning_tree(graph, method),
    };
    tree.map(AlgorithmOutput::SpanningTree)
}
