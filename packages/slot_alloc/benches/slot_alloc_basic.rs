//! Basic benchmarks for the `slot_alloc` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use slot_alloc::{ExtensiblePoolAllocator, FixedAllocator, HeapAllocator, SlotAllocator};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

type TestItem = [u64; 4];
const ITEM_COUNT: usize = 256;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_alloc_basic");

    group.bench_function("fixed_fill_and_reset", |b| {
        let mut allocator = FixedAllocator::<TestItem, ITEM_COUNT>::new();

        b.iter(|| {
            let mut last = None;

            for _ in 0..ITEM_COUNT {
                last = Some(black_box(allocator.allocate(1).unwrap()));
            }

            allocator.deallocate(last.unwrap(), 1);
        });
    });

    group.bench_function("extensible_fill_and_release", |b| {
        let mut allocator = ExtensiblePoolAllocator::<TestItem, 32>::new();
        let mut ptrs = Vec::with_capacity(ITEM_COUNT);

        b.iter(|| {
            for _ in 0..ITEM_COUNT {
                ptrs.push(black_box(allocator.allocate(1).unwrap()));
            }

            for ptr in ptrs.drain(..) {
                allocator.deallocate(ptr, 1).unwrap();
            }
        });
    });

    group.bench_function("heap_fill_and_release", |b| {
        let mut allocator = HeapAllocator::<TestItem>::new();
        let mut ptrs = Vec::with_capacity(ITEM_COUNT);

        b.iter(|| {
            for _ in 0..ITEM_COUNT {
                ptrs.push(black_box(allocator.allocate(1).unwrap()));
            }

            for ptr in ptrs.drain(..) {
                // SAFETY: Each pointer came from allocate(1) on this allocator.
                unsafe { allocator.deallocate(ptr, 1) }.unwrap();
            }
        });
    });

    group.bench_function("extensible_equality", |b| {
        let mut a1 = ExtensiblePoolAllocator::<TestItem, 32>::with_pool_count(8);
        let mut a2 = ExtensiblePoolAllocator::<TestItem, 32>::with_pool_count(8);

        for _ in 0..ITEM_COUNT {
            _ = a1.allocate(1).unwrap();
            _ = a2.allocate(1).unwrap();
        }

        b.iter(|| black_box(&a1) == black_box(&a2));
    });

    group.finish();
}
