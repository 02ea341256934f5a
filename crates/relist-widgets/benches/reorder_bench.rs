//! Benchmarks for order rebuild, position derivation and drag resolution.
//!
//! Run with: cargo bench -p relist-widgets --bench reorder_bench

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use relist_widgets::reorder::resolve_index;
use relist_widgets::{Key, LayoutTracker, OrderEntry, OrderModel, PositionMap, ReorderEngine, Section};
use web_time::Instant;

fn entries(n: usize) -> Vec<OrderEntry> {
    (0..n)
        .map(|i| {
            let section = if i % 5 == 0 {
                Section::Unconstrained
            } else {
                Section::Group((i % 3) as i64)
            };
            OrderEntry::new(format!("item-{i}").as_str(), section)
        })
        .collect()
}

fn measured(entries: &[OrderEntry]) -> LayoutTracker {
    let heights = LayoutTracker::new();
    for (i, e) in entries.iter().enumerate() {
        heights.report(&e.key, 32.0 + (i % 7) as f32 * 4.0);
    }
    heights
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("order/rebuild");
    for &n in &[100usize, 1_000, 10_000] {
        let data = entries(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| {
                let mut model = OrderModel::new();
                model.rebuild(black_box(data));
                black_box(model.len())
            });
        });
    }
    group.finish();
}

fn bench_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("positions/derive");
    for &n in &[100usize, 1_000, 10_000] {
        let data = entries(n);
        let heights = measured(&data);
        let keys: Vec<Key> = data.iter().map(|e| e.key.clone()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &keys, |b, keys| {
            b.iter(|| black_box(PositionMap::derive(black_box(keys), &heights).total_height()));
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let data = entries(1_000);
    let heights = measured(&data);
    let keys: Vec<Key> = data.iter().map(|e| e.key.clone()).collect();
    let positions = PositionMap::derive(&keys, &heights);
    let mid = positions.total_height() / 2.0;
    c.bench_function("reorder/resolve_index_1000", |b| {
        b.iter(|| black_box(resolve_index(black_box(mid), &keys, &positions, &heights)));
    });
}

fn bench_drag_sweep(c: &mut Criterion) {
    let data: Vec<OrderEntry> = (0..500)
        .map(|i| OrderEntry::new(format!("row-{i}").as_str(), Section::Unconstrained))
        .collect();
    let heights = measured(&data);
    c.bench_function("reorder/drag_sweep_500", |b| {
        b.iter(|| {
            let mut engine = ReorderEngine::default();
            engine.rebuild(&data, &heights);
            let key = data[0].key.clone();
            engine.begin_drag(&key, Instant::now()).ok();
            for step in 0..100 {
                engine.update_drag(&key, step as f32 * 40.0, &heights);
            }
            black_box(engine.finalize_now(&heights))
        });
    });
}

criterion_group!(benches, bench_rebuild, bench_positions, bench_resolve, bench_drag_sweep);
criterion_main!(benches);
