//! Criterion benchmarks for the pricer_pricing engine.
//!
//! Benchmarks cover:
//! - Lane stream initialisation
//! - Path matrix generation (1K, 10K, 100K paths)
//! - Full pricing runs in single and double precision
//! - The serial reference pricer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::{OptionSpec, Precision};
use pricer_pricing::device::{CpuBackend, LaunchShape};
use pricer_pricing::mc::SimulationConfig;
use pricer_pricing::rng::StreamPool;
use pricer_pricing::{PricingEngine, ReferencePricer};

fn reference_spec() -> OptionSpec {
    OptionSpec::builder()
        .spot(40.0)
        .strike(35.0)
        .risk_free_rate(0.03)
        .volatility(0.2)
        .tenor(1.0 / 3.0)
        .time_step(1.0 / 261.0)
        .barrier(45.0)
        .build()
        .unwrap()
}

fn config(num_paths: usize, precision: Precision) -> SimulationConfig {
    SimulationConfig::builder()
        .num_paths(num_paths)
        .seed(1234)
        .precision(precision)
        .build()
        .unwrap()
}

/// Benchmark seeding one stream per lane.
fn bench_stream_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_init");
    let backend = CpuBackend::new().unwrap();

    for group_count in [16, 64, 256] {
        let shape = LaunchShape::new(256, group_count);
        group.bench_with_input(
            BenchmarkId::new("lanes", shape.lane_count()),
            &shape,
            |b, shape| {
                b.iter(|| {
                    let pool = StreamPool::init(&backend, shape, 1234).unwrap();
                    black_box(pool.len())
                });
            },
        );
    }

    group.finish();
}

/// Benchmark path generation alone.
fn bench_path_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_generation");
    group.sample_size(20);

    let engine = PricingEngine::new(CpuBackend::new().unwrap());
    let spec = reference_spec();

    for num_paths in [1_000, 10_000, 100_000] {
        let config = config(num_paths, Precision::Double);
        group.bench_with_input(
            BenchmarkId::new("f64", num_paths),
            &config,
            |b, config| {
                b.iter(|| black_box(engine.simulate_paths::<f64>(&spec, config).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark full pricing runs.
fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(10);

    let engine = PricingEngine::new(CpuBackend::new().unwrap());
    let spec = reference_spec();

    for precision in [Precision::Single, Precision::Double] {
        for num_paths in [10_000, 100_000] {
            let config = config(num_paths, precision);
            group.bench_with_input(
                BenchmarkId::new(precision.as_str(), num_paths),
                &config,
                |b, config| {
                    b.iter(|| black_box(engine.price(&spec, config).unwrap()));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the serial reference pricer as the speed-up baseline.
fn bench_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference");
    group.sample_size(10);
    let spec = reference_spec();

    for num_paths in [1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("serial", num_paths),
            &num_paths,
            |b, &n| {
                let mut pricer = ReferencePricer::new(42);
                b.iter(|| black_box(pricer.price_serial(&spec, n)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_stream_init,
    bench_path_generation,
    bench_full_run,
    bench_reference
);
criterion_main!(benches);
