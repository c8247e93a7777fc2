//! Benchmarks for the simulation tick loop.
//!
//! The per-tick pass (path delivery, unit update, AI decisions) is the
//! engine's hot path; these measure it on the built-in battlefield.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use mudfront::core::config::SimConfig;
use mudfront::sim::scenario::Scenario;
use mudfront::sim::tick::run_tick;
use mudfront::sim::world::SimulationWorld;

fn bench_world(config: &SimConfig) -> SimulationWorld {
    Scenario::flanders_default(config).build_world(config.clone(), 1916)
}

fn bench_single_tick(c: &mut Criterion) {
    let config = SimConfig::default();

    c.bench_function("single_tick", |b| {
        b.iter_batched(
            || bench_world(&config),
            |mut world| {
                let events = run_tick(&mut world, black_box(config.tick_ms));
                black_box(events)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_battle_opening(c: &mut Criterion) {
    // First hundred ticks: attackers path across no-man's-land while the
    // garrison opens fire
    let config = SimConfig::default();

    c.bench_function("battle_100_ticks", |b| {
        b.iter_batched(
            || bench_world(&config),
            |mut world| {
                for _ in 0..100 {
                    black_box(run_tick(&mut world, config.tick_ms));
                }
                world
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_single_tick, bench_battle_opening);
criterion_main!(benches);
