//! Retrieve benchmarks for the static providers.
//!
//! Measures the cost of one full fetch-and-decode, which is what a caller
//! pays on every reload.

use confmap_provider::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::fs;
use tempfile::TempDir;

fn document(sections: usize) -> String {
    let mut text = String::new();
    for i in 0..sections {
        text.push_str(&format!(
            "section_{i}:\n  host: host-{i}.internal\n  port: {}\n  enabled: true\n  tags: [a, b, c]\n",
            8000 + i
        ));
    }
    text
}

/// Benchmark file retrieve at increasing document sizes
fn benchmark_file_retrieve(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = Context::background();

    let mut group = c.benchmark_group("file_retrieve");
    for sections in [1usize, 10, 100] {
        let path = temp_dir.path().join(format!("config_{sections}.yaml"));
        let text = document(sections);
        fs::write(&path, &text).unwrap();
        let provider = FileProvider::new(&path);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &sections, |b, _| {
            b.iter(|| {
                let retrieved = provider.retrieve(&ctx, None).unwrap();
                black_box(retrieved.config_map().len());
                retrieved.release().unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark in-memory retrieve (decode cost without I/O)
fn benchmark_inmemory_retrieve(c: &mut Criterion) {
    let ctx = Context::background();
    let provider = InMemoryProvider::new(document(10));

    let mut group = c.benchmark_group("inmemory_retrieve");
    group.bench_function("10_sections", |b| {
        b.iter(|| {
            let retrieved = provider.retrieve(&ctx, None).unwrap();
            black_box(retrieved.into_config_map());
        });
    });
    group.finish();
}

/// Benchmark nested lookups on a retrieved snapshot
fn benchmark_get_path(c: &mut Criterion) {
    let map = ConfigMap::from_yaml_str(&document(100)).unwrap();

    let mut group = c.benchmark_group("get_path");
    group.bench_function("nested_lookup", |b| {
        b.iter(|| {
            black_box(map.get_path(black_box("section_50.port")));
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_file_retrieve,
    benchmark_inmemory_retrieve,
    benchmark_get_path
);
criterion_main!(benches);
