use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use refmerge::{EmbeddedUpdates, Record, RecordMerger, RecordStore, UpdateSource};

fn make_atlas() -> RecordStore {
    // Regions 1..=141 so the embedded update set applies cleanly.
    let mut store = RecordStore::new();
    for i in 1..=141u32 {
        store.insert(
            i,
            Record::new()
                .with_field("name", format!("Region {i}"))
                .with_field("groups", vec!["Cortex"]),
        );
    }
    store
}

fn bench_merge_embedded(c: &mut Criterion) {
    let patch = EmbeddedUpdates.updates().unwrap();
    let merger = RecordMerger::new();

    let mut group = c.benchmark_group("merge");
    group.throughput(Throughput::Elements(patch.field_count() as u64));

    group.bench_function("embedded_fresh", |b| {
        b.iter_batched(
            make_atlas,
            |mut store| {
                let report = merger.apply(&mut store, black_box(&patch)).unwrap();
                black_box(report)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("embedded_reapply", |b| {
        let mut merged = make_atlas();
        merger.apply(&mut merged, &patch).unwrap();
        b.iter_batched(
            || merged.clone(),
            |mut store| {
                let report = merger.apply(&mut store, black_box(&patch)).unwrap();
                black_box(report)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_parse_embedded(c: &mut Criterion) {
    c.bench_function("patch/parse_embedded", |b| {
        b.iter(|| black_box(EmbeddedUpdates.updates().unwrap()));
    });
}

criterion_group!(benches, bench_merge_embedded, bench_parse_embedded);
criterion_main!(benches);
