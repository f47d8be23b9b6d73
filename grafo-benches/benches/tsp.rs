//! Travelling-salesman heuristics over random Euclidean instances.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use grafo_benches::{
    error::BenchSetupError, params::EuclideanBenchParams, source::euclidean_complete,
};
use grafo_core::tsp::{christofides, nearest_neighbor_tour};

const SEED: u64 = 5;

/// Christofides matches odd vertices exactly only up to twenty of them, so
/// the larger sizes exercise the greedy matching fallback as well.
const CITY_COUNTS: &[usize] = &[16, 64, 128];

fn tsp_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("tsp");
    group.sample_size(10);

    for &city_count in CITY_COUNTS {
        let params = EuclideanBenchParams { city_count };
        let graph = euclidean_complete(city_count, SEED)?;
        christofides(&graph)?;

        group.bench_with_input(BenchmarkId::new("christofides", params), &graph, |b, graph| {
            b.iter(|| christofides(graph));
        });
        group.bench_with_input(
            BenchmarkId::new("nearest_neighbor", params),
            &graph,
            |b, graph| {
                b.iter(|| nearest_neighbor_tour(graph, None));
            },
        );
    }

    group.finish();
    Ok(())
}

fn tsp(c: &mut Criterion) {
    if let Err(err) = tsp_impl(c) {
        panic!("tsp benchmark setup failed: {err}");
    }
}

criterion_group!(benches, tsp);
criterion_main!(benches);
