//! Benchmarks for scheduler polling.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use sonic_graph::scheduler::Scheduler;
use sonic_graph::MappingEngine;

use crate::mapping::vault;
use crate::VAULT_SIZES;

pub fn bench_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback/poll");

    for &size in VAULT_SIZES {
        let notes = MappingEngine::default().map_nodes(&vault(size));

        // One poll a third of the way through: some notes fire, highlights expire
        group.bench_with_input(BenchmarkId::new("mid_playback", size), &notes, |b, notes| {
            b.iter_batched(
                || {
                    let mut scheduler = Scheduler::new();
                    scheduler.start(notes.clone(), 0.0);
                    scheduler.poll(19.9, &mut (), &mut ());
                    scheduler
                },
                |mut scheduler| black_box(scheduler.poll(black_box(20.0), &mut (), &mut ())),
                BatchSize::SmallInput,
            )
        });

        // A full playback at 100 ms polls
        group.bench_with_input(BenchmarkId::new("full_run", size), &notes, |b, notes| {
            b.iter(|| {
                let mut scheduler = Scheduler::new();
                scheduler.start(notes.clone(), 0.0);
                let mut now = 0.0;
                while scheduler.is_playing() {
                    scheduler.poll(now, &mut (), &mut ());
                    now += 0.1;
                }
                black_box(scheduler.stats())
            })
        });
    }

    group.finish();
}
