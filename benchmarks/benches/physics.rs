//! Physics and round benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::Vec2;
use granny_bench::*;
use granny_sim::physics::broadphase::AllPairs;
use granny_sim::physics::narrowphase::detect_collision;
use granny_sim::physics::raycast::raycast;
use granny_sim::physics::solver::solve_contacts;
use granny_sim::{BodyFactory, BodyOverrides};

// ---------------------------------------------------------------------------
// Broadphase
// ---------------------------------------------------------------------------

fn bench_broadphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("broadphase/dense_circles");
        for &n in &[100, 250, 500, 1000] {
            let bodies = setup_circle_world(n);
            let broadphase = AllPairs::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| broadphase.find_pairs(&bodies));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/mixed_shapes");
        for &n in &[100, 250, 500, 1000] {
            let bodies = setup_mixed_world(n);
            let broadphase = AllPairs::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| broadphase.find_pairs(&bodies));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/sparse");
        for &n in &[100, 250, 500, 1000] {
            let bodies = setup_sparse_world(n);
            let broadphase = AllPairs::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| broadphase.find_pairs(&bodies));
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Narrowphase
// ---------------------------------------------------------------------------

fn bench_narrowphase(c: &mut Criterion) {
    let mut group = c.benchmark_group("narrowphase/dispatch");
    let circle = |x: f32| BodyFactory::circle(x, 0.0, 10.0, BodyOverrides::new()).unwrap();
    let rect = |x: f32| BodyFactory::rect(x, -10.0, 20.0, 20.0, BodyOverrides::new()).unwrap();

    let (a, b_hit, b_miss) = (circle(0.0), circle(15.0), circle(50.0));
    group.bench_function("circle_circle_hit", |b| {
        b.iter(|| detect_collision(&a, &b_hit, 10.0));
    });
    group.bench_function("circle_circle_miss", |b| {
        b.iter(|| detect_collision(&a, &b_miss, 10.0));
    });

    let r = rect(5.0);
    group.bench_function("circle_rect", |b| {
        b.iter(|| detect_collision(&a, &r, 10.0));
    });
    let r2 = rect(15.0);
    group.bench_function("rect_rect", |b| {
        b.iter(|| detect_collision(&r, &r2, 10.0));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver/contact_count");
    for &n in &[10, 50, 100, 500] {
        let (bodies, contacts) = setup_contacts(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || bodies.clone(),
                |mut bodies| solve_contacts(&contacts, &mut bodies, 0.3),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

fn bench_raycast(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast/segment");
    for &n in &[100, 500, 1000] {
        let bodies = setup_sparse_world(n);
        let end = Vec2::splat((n as f32).sqrt() * 200.0);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| raycast(&bodies, Vec2::ZERO, end, &[]));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("pipeline/step");
        group.sample_size(30);
        for &n in &[50, 100, 500, 1000] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |mut world| world.update(1.0),
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/house_round_60ticks");
        group.sample_size(20);
        for &runners in &[1, 8, 32] {
            group.bench_with_input(
                BenchmarkId::from_parameter(runners),
                &runners,
                |b, &runners| {
                    b.iter_batched(
                        || setup_house_round(runners),
                        |(mut world, mut round)| {
                            for _ in 0..60 {
                                world.update(1.0);
                                round.tick(&mut world, 1.0 / 60.0);
                            }
                        },
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
        group.finish();
    }
}

criterion_group!(
    benches,
    bench_broadphase,
    bench_narrowphase,
    bench_solver,
    bench_raycast,
    bench_pipeline,
);
criterion_main!(benches);
