//! Criterion benchmarks for compplan_core simulation
//!
//! Run with: cargo bench -p compplan_core

use compplan_core::SimulationCache;
use compplan_core::config::EngineConfig;
use compplan_core::model::PlanType;
use compplan_core::simulation::{SimulationInput, simulate, simulate_with};
use compplan_core::sweep::sweep;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn bench_default_inputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_input");

    for plan in PlanType::ALL {
        let input = plan.default_input();
        group.bench_with_input(BenchmarkId::new("simulate", plan), &input, |b, input| {
            b.iter(|| simulate(black_box(input)))
        });
    }

    group.finish();
}

fn bench_deep_matrix(c: &mut Criterion) {
    // Widest and deepest matrix in the domain walks the most levels
    let input = SimulationInput::from_vector(PlanType::Matrix, &[4.0, 10.0, 240.0, 320.0]);
    let config = EngineConfig::default();

    c.bench_function("matrix_4x10", |b| {
        b.iter(|| simulate_with(black_box(&input), black_box(&config)))
    });
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    let config = EngineConfig::default();

    for plan in PlanType::ALL {
        group.bench_with_input(BenchmarkId::new("grid", plan), &plan, |b, &plan| {
            b.iter(|| sweep(black_box(plan), black_box(&config)))
        });
    }

    group.finish();
}

fn bench_cache_vs_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_comparison");
    let inputs = SimulationInput::grid(PlanType::Generation);

    group.bench_function("direct", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(simulate(black_box(input)));
            }
        })
    });

    let mut cache = SimulationCache::default();
    for input in &inputs {
        cache.get_or_simulate(input);
    }
    group.bench_function("warm_cache", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(cache.get_or_simulate(black_box(input)));
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_default_inputs,
    bench_deep_matrix,
    bench_sweep,
    bench_cache_vs_direct
);
criterion_main!(benches);
