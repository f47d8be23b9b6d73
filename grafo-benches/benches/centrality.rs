//! Path- and walk-based centrality benchmarks.
//!
//! Brandes betweenness runs one shortest-path sweep per source; PageRank
//! iterates a sparse power method until the tolerance is met.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use grafo_benches::{
    error::BenchSetupError,
    params::SparseBenchParams,
    source::{SyntheticGraphConfig, sparse_random},
};
use grafo_core::centrality::{PageRankConfig, betweenness_centrality, pagerank};

const SEED: u64 = 42;

const VERTEX_COUNTS: &[usize] = &[100, 500, 1_000];

const MEAN_DEGREE: usize = 6;

fn centrality_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("centrality");
    group.sample_size(20);

    for &vertex_count in VERTEX_COUNTS {
        let params = SparseBenchParams {
            vertex_count,
            mean_degree: MEAN_DEGREE,
        };
        let graph = sparse_random(&SyntheticGraphConfig {
            params,
            directed: false,
            seed: SEED,
        })?;
        // Fail during setup rather than inside the timed loop.
        pagerank(&graph, PageRankConfig::default())?;

        group.bench_with_input(BenchmarkId::new("betweenness", params), &graph, |b, graph| {
            b.iter(|| betweenness_centrality(graph, true));
        });
        group.bench_with_input(BenchmarkId::new("pagerank", params), &graph, |b, graph| {
            b.iter(|| pagerank(graph, PageRankConfig::default()));
        });
    }

    group.finish();
    Ok(())
}

fn centrality(c: &mut Criterion) {
    if let Err(err) = centrality_impl(c) {
        panic!("centrality benchmark setup failed: {err}");
    }
}

criterion_group!(benches, centrality);
criterion_main!(benches);
