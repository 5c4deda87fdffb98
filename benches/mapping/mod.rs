//! Benchmarks for the mapping engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sonic_graph::graph::NodeType;
use sonic_graph::mapping::instrument::select_instrument;
use sonic_graph::mapping::{FamilyPreferences, InstrumentRegistry, TitleHasher};
use sonic_graph::{GraphNode, MappingEngine};

use crate::VAULT_SIZES;

pub fn vault(size: usize) -> Vec<GraphNode> {
    let mut rng = fastrand::Rng::with_seed(size as u64);
    (0..size)
        .map(|i| {
            let links: Vec<String> = (0..rng.usize(..12))
                .map(|_| format!("n{}", rng.usize(..size)))
                .collect();
            GraphNode::new(
                format!("n{i}"),
                format!("Note {i} {}", rng.u32(..)),
                format!("a/b{}/n{i}.md", i % 9),
            )
            .with_file_size(rng.u64(..5_000_000))
            .with_connections(links)
            .with_creation_date(rng.i64(0..1_000_000_000))
        })
        .collect()
}

pub fn bench_map_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping/map_nodes");
    let engine = MappingEngine::default();

    for &size in VAULT_SIZES {
        let nodes = vault(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &nodes, |b, nodes| {
            b.iter(|| engine.map_nodes(black_box(nodes)))
        });
    }

    group.finish();
}

pub fn bench_instrument_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping/select_instrument");
    let hasher = TitleHasher::new();
    let prefs = FamilyPreferences::default();

    // Full catalogue: first preferred family hits
    let full = InstrumentRegistry::default();
    group.bench_function("full_catalogue", |b| {
        b.iter(|| {
            for node_type in NodeType::ALL {
                black_box(select_instrument(node_type, &full, &prefs, &hasher));
            }
        })
    });

    // Only ungrouped instruments: every family misses
    let sparse = InstrumentRegistry::with_enabled(["choir"]);
    group.bench_function("ungrouped_only", |b| {
        b.iter(|| {
            for node_type in NodeType::ALL {
                black_box(select_instrument(node_type, &sparse, &prefs, &hasher));
            }
        })
    });

    group.finish();
}
