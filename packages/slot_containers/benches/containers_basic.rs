//! Basic benchmarks for the `slot_containers` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use slot_alloc::{ExtensiblePoolAllocator, FixedAllocator};
use slot_containers::{List, OrderedMap};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const ITEM_COUNT: u32 = 128;

/// Keys in an order that keeps the unbalanced tree reasonably shallow.
fn scrambled_keys() -> impl Iterator<Item = u32> {
    (0..ITEM_COUNT).map(|n| n.wrapping_mul(37) % ITEM_COUNT)
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("containers_basic");

    group.bench_function("map_fill_heap", |b| {
        b.iter(|| {
            let mut map = OrderedMap::<u32, u64>::new();

            for key in scrambled_keys() {
                map.insert(key, u64::from(key)).unwrap();
            }

            black_box(map)
        });
    });

    group.bench_function("map_fill_extensible", |b| {
        b.iter(|| {
            let mut map = OrderedMap::<u32, u64, ExtensiblePoolAllocator<(u32, u64), 32>>::new();

            for key in scrambled_keys() {
                map.insert(key, u64::from(key)).unwrap();
            }

            black_box(map)
        });
    });

    group.bench_function("map_lookup", |b| {
        let mut map = OrderedMap::<u32, u64, ExtensiblePoolAllocator<(u32, u64), 32>>::new();

        for key in scrambled_keys() {
            map.insert(key, u64::from(key)).unwrap();
        }

        b.iter(|| {
            for key in 0..ITEM_COUNT {
                black_box(map.get(black_box(&key)));
            }
        });
    });

    group.bench_function("list_fill_fixed", |b| {
        b.iter(|| {
            let mut list = List::<u32, FixedAllocator<u32, 128>>::new();

            for value in 0..ITEM_COUNT {
                list.append(value).unwrap();
            }

            black_box(list)
        });
    });

    group.finish();
}
