//! Criterion benchmarks for lineup model building and solving.
//!
//! Uses seeded synthetic slates so timings are comparable across runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lineup_ilp::catalog::synthetic::random_slate;
use lineup_ilp::catalog::PlayerCatalog;
use lineup_ilp::lineup::LineupOptimizer;
use lineup_ilp::model::LineupConfig;
use lineup_ilp::solver::{BranchAndBoundSolver, IlpSolver, SolverConfig};

fn slate(size: usize) -> PlayerCatalog {
    PlayerCatalog::from_rows(random_slate(size, 42)).expect("synthetic slate is valid")
}

fn bench_build_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_model");

    for &size in &[50, 200, 1000] {
        let catalog = slate(size);
        let optimizer = LineupOptimizer::new(LineupConfig::default());
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| {
                let model = optimizer.build_model(black_box(catalog));
                black_box(model)
            })
        });
    }
    group.finish();
}

fn bench_branch_and_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch_and_bound");
    group.sample_size(10);

    for &size in &[20, 100, 400] {
        let catalog = slate(size);
        let model = LineupOptimizer::new(LineupConfig::default())
            .build_model(&catalog)
            .expect("default config is valid");
        let config = SolverConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &(model, config), |b, (m, c)| {
            b.iter(|| {
                let solution = BranchAndBoundSolver::new().solve(black_box(m), black_box(c));
                black_box(solution)
            })
        });
    }
    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    group.sample_size(10);

    for &(size, cap) in &[(30usize, 50_000.0), (60, 40_000.0), (400, 50_000.0)] {
        let catalog = slate(size);
        let optimizer = LineupOptimizer::new(LineupConfig::default().with_salary_cap(cap));
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_cap{}", size, cap), size),
            &catalog,
            |b, catalog| {
                b.iter(|| {
                    let lineup = optimizer.optimize(black_box(catalog));
                    black_box(lineup)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build_model, bench_branch_and_bound, bench_optimize);
criterion_main!(benches);
