//! Integration tests for the `slot_alloc` package.
//!
//! These tests exercise the allocators through their public API only, both directly and
//! through the `SlotAllocator` trait the way a container would.
#![allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::indexing_slicing,
    reason = "test code doesn't need the same safety rigor as production code"
)]

use std::ptr::NonNull;

use slot_alloc::{Error, ExtensiblePoolAllocator, FixedAllocator, HeapAllocator, SlotAllocator};

fn fill_until_failure<const CAPACITY: usize>(step: usize) {
    let mut allocator = FixedAllocator::<u32, CAPACITY>::new();

    let mut total = 0_usize;

    loop {
        let before = allocator.allocated_count();

        match allocator.allocate(step) {
            Ok(_) => {
                total += step;
                assert!(total <= CAPACITY);
                assert_eq!(allocator.allocated_count(), total);
            }
            Err(error) => {
                assert!(total + step > CAPACITY);
                assert_eq!(
                    error,
                    Error::OutOfCapacity {
                        requested: step,
                        allocated: before,
                        capacity: CAPACITY,
                    }
                );
                assert_eq!(allocator.allocated_count(), before);
                break;
            }
        }
    }
}

#[test]
fn fixed_fails_exactly_when_crossing_capacity() {
    for step in 1..=4 {
        fill_until_failure::<1>(step);
        fill_until_failure::<3>(step);
        fill_until_failure::<7>(step);
        fill_until_failure::<16>(step);
    }
}

#[test]
fn fixed_equality_follows_written_bytes() {
    let mut a1 = FixedAllocator::<i32, 3>::new();
    let mut a2 = FixedAllocator::<i32, 3>::new();

    assert_eq!(a1, a2);

    let p1 = a1.allocate(3).unwrap();
    let p2 = a2.allocate(3).unwrap();

    unsafe {
        p1.write(3);
        p1.add(1).write(8);
        p1.add(2).write(7);
    }

    assert_ne!(a1, a2);

    unsafe {
        p2.write(3);
        p2.add(1).write(8);
        p2.add(2).write(7);
    }

    assert_eq!(a1, a2);

    let a3 = a1.take();

    assert_eq!(a3, a3);
    assert_eq!(a2, a3);
    assert_ne!(a1, a2);

    unsafe {
        p2.add(1).write(25);
    }

    assert_ne!(a2, a3);
    assert!(matches!(
        a2.allocate(3),
        Err(Error::OutOfCapacity { .. })
    ));
}

#[test]
fn fixed_deallocate_always_resets() {
    let mut allocator = FixedAllocator::<u64, 8>::new();

    for count in [1, 3, 8] {
        let ptr = allocator.allocate(count).unwrap();
        allocator.deallocate(ptr, count);
        assert_eq!(allocator.allocated_count(), 0);

        _ = allocator.allocate(1).unwrap();
        allocator.deallocate(NonNull::dangling(), 0);
        assert_eq!(allocator.allocated_count(), 0);
    }
}

fn grow_past_first_pool<const POOL_SIZE: usize>() {
    let mut allocator = ExtensiblePoolAllocator::<u64, POOL_SIZE>::new();

    for _ in 0..=POOL_SIZE {
        _ = allocator.allocate(1).unwrap();
    }

    assert_eq!(allocator.capacity(), 2 * POOL_SIZE);
    assert_eq!(allocator.allocated_count(), POOL_SIZE + 1);
}

#[test]
fn extensible_grows_by_one_pool_when_full() {
    grow_past_first_pool::<1>();
    grow_past_first_pool::<2>();
    grow_past_first_pool::<5>();
    grow_past_first_pool::<64>();
}

#[test]
fn extensible_scenario_with_late_writes() {
    let mut a1 = ExtensiblePoolAllocator::<i32, 2>::new();
    let mut a2 = ExtensiblePoolAllocator::<i32, 2>::new();

    assert_eq!(a1, a2);

    let p1_0 = a1.allocate(1).unwrap();
    let p1_1 = a1.allocate(1).unwrap();

    unsafe {
        p1_0.write(59);
        p1_1.write(36);
    }

    assert_ne!(a1, a2);

    let p2_0 = a2.allocate(1).unwrap();
    let p2_1 = a2.allocate(1).unwrap();

    unsafe {
        p2_0.write(59);
        p2_1.write(36);
    }

    assert_eq!(a1, a2);

    let mut a3 = a1.take();

    assert_eq!(a3, a3);
    assert_ne!(a1, a3);
    assert_eq!(a2, a3);

    // Pointers obtained before the move still refer to the storage now owned by a3.
    unsafe {
        p1_1.write(78);
    }

    assert_ne!(a2, a3);

    unsafe {
        p2_1.write(78);
    }

    assert_eq!(a2, a3);

    let p3_2 = a3.allocate(1).unwrap();

    assert_ne!(a2, a3);
    assert_eq!(a3.capacity(), 4);

    a3.deallocate(p3_2, 1).unwrap();

    assert_eq!(a3.allocated_count(), 2);
    assert_eq!(
        a3.deallocate(p1_0, 2),
        Err(Error::InvalidArgument { count: 2 })
    );
    assert_eq!(a2.allocate(3), Err(Error::InvalidArgument { count: 3 }));
}

/// Allocates, writes, frees and re-allocates single items the way a node-based container
/// does, returning the final allocated count.
fn churn<A: SlotAllocator<Item = u64>>(allocator: &mut A, rounds: usize) -> usize {
    let mut live = Vec::new();

    for round in 0..rounds {
        let ptr = allocator.allocate(1).unwrap();
        unsafe {
            ptr.write(round as u64);
        }
        live.push(ptr);

        if round % 3 == 2 {
            let released = live.remove(0);
            unsafe { allocator.deallocate(released, 1) }.unwrap();
        }
    }

    for (expected, ptr) in live.iter().enumerate() {
        let value = unsafe { ptr.read() };
        assert!(value as usize >= expected);
    }

    allocator.allocated_count()
}

#[test]
fn trait_generic_usage_with_pool_and_heap() {
    let mut pool = ExtensiblePoolAllocator::<u64, 4>::new();
    let mut heap = HeapAllocator::<u64>::new();

    let pool_count = churn(&mut pool, 30);
    let heap_count = churn(&mut heap, 30);

    assert_eq!(pool_count, 20);
    assert_eq!(heap_count, 20);

    // Reuse keeps the pool allocator from growing beyond what is live at once.
    assert!(pool.capacity() <= 24);
}

#[test]
fn rebind_preserves_sizing_policy() {
    #[derive(Debug)]
    struct Node {
        _value: u64,
        _next: Option<NonNull<Node>>,
    }

    let fixed = FixedAllocator::<u8, 6>::new();
    let mut fixed_nodes: FixedAllocator<Node, 6> = fixed.rebind::<Node>();
    assert_eq!(fixed_nodes.capacity(), 6);
    _ = fixed_nodes.allocate(6).unwrap();
    assert!(fixed_nodes.allocate(1).is_err());

    let pool = ExtensiblePoolAllocator::<u8, 3>::new();
    let pool_nodes: ExtensiblePoolAllocator<Node, 3> = pool.rebind::<Node>();
    assert_eq!(pool_nodes.pool_size(), 3);
    assert_eq!(pool_nodes.capacity(), 3);
}

#[test]
fn select_on_copy_never_copies_content() {
    let mut fixed = FixedAllocator::<u32, 2>::new();
    let ptr = fixed.allocate(2).unwrap();
    unsafe {
        ptr.write(1);
        ptr.add(1).write(2);
    }

    let fixed_copy = SlotAllocator::select_on_copy(&fixed);
    assert_eq!(fixed_copy.allocated_count(), 0);
    assert_eq!(fixed_copy, FixedAllocator::new());

    let mut pool = ExtensiblePoolAllocator::<u32, 2>::with_pool_count(4);
    _ = pool.allocate(1).unwrap();

    let pool_copy = SlotAllocator::select_on_copy(&pool);
    assert_eq!(pool_copy.allocated_count(), 0);
    assert_eq!(pool_copy, ExtensiblePoolAllocator::new());
}

#[test]
fn allocators_are_thread_mobile() {
    let mut allocator = ExtensiblePoolAllocator::<u64, 4>::new();
    let ptr = allocator.allocate(1).unwrap();
    unsafe {
        ptr.write(99);
    }

    let allocator = std::thread::spawn(move || {
        let mut allocator = allocator;
        _ = allocator.allocate(1).unwrap();
        allocator
    })
    .join()
    .unwrap();

    assert_eq!(allocator.allocated_count(), 2);
    assert_eq!(unsafe { ptr.read() }, 99);
}
