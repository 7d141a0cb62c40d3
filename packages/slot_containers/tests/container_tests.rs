//! Integration tests for the `slot_containers` package.
//!
//! These tests drive the containers with each allocator from `slot_alloc` through the public
//! API only.

use std::marker::PhantomData;
use std::ptr::NonNull;

use slot_alloc::{
    Error as AllocError, ExtensiblePoolAllocator, FixedAllocator, HeapAllocator, SlotAllocator,
};
use slot_containers::{Error, List, OrderedMap};

fn factorial(n: u64) -> u64 {
    (1..=n).product()
}

/// The factorials of 0 to 9, as printed by the demo.
const FACTORIALS: [u64; 10] = [1, 1, 2, 6, 24, 120, 720, 5040, 40320, 362_880];

#[test]
fn fixed_map_copy_then_overflow() {
    let mut map1 = OrderedMap::<i32, String, FixedAllocator<(i32, String), 3>>::new();
    map1.insert(0, "test0".to_string()).unwrap();
    map1.insert(1, "test1".to_string()).unwrap();

    let mut map2 = map1.clone();
    assert_eq!(map1, map2);

    map2.insert(2, "test2".to_string()).unwrap();
    assert_eq!(map2.len(), 3);

    let result = map2.insert(3, "test3".to_string());
    assert!(matches!(
        result,
        Err(Error::Allocation(AllocError::OutOfCapacity {
            requested: 1,
            allocated: 3,
            capacity: 3,
        }))
    ));

    assert_eq!(map2.len(), 3);
    assert_eq!(map1.len(), 2);
}

#[test]
fn extensible_map_grows_past_pool_size() {
    let mut map = OrderedMap::<i32, String, ExtensiblePoolAllocator<(i32, String), 3>>::new();

    for key in 0..4 {
        map.insert(key, format!("test{key}")).unwrap();
    }

    assert_eq!(map.len(), 4);
    assert_eq!(map.allocator().pool_count(), 2);
    assert_eq!(map.allocator().capacity(), 6);

    let values = map.iter().map(|(_, v)| v.as_str()).collect::<Vec<_>>();
    assert_eq!(values, ["test0", "test1", "test2", "test3"]);
}

#[test]
fn factorial_map_with_each_allocator() {
    let mut default_map = OrderedMap::<u64, u64>::new();
    let mut pool_map = OrderedMap::<u64, u64, ExtensiblePoolAllocator<(u64, u64), 5>>::new();

    for n in 0..10 {
        *default_map.get_or_insert_with(n, u64::default).unwrap() = factorial(n);
        *pool_map.get_or_insert_with(n, u64::default).unwrap() = factorial(n);
    }

    assert_eq!(default_map.get(&0), Some(&1));
    assert_eq!(pool_map.get(&9), Some(&362_880));
    assert_eq!(pool_map.allocator().pool_count(), 2);

    let from_default = default_map.iter().map(|(_, v)| *v).collect::<Vec<_>>();
    let from_pool = pool_map.iter().map(|(_, v)| *v).collect::<Vec<_>>();
    assert_eq!(from_default, FACTORIALS);
    assert_eq!(from_pool, FACTORIALS);
}

#[test]
fn index_list_with_each_allocator() {
    let mut default_list = List::<u64>::new();
    let mut pool_list = List::<u64, ExtensiblePoolAllocator<u64, 8>>::new();

    for n in 0..10 {
        default_list.append(n).unwrap();
        pool_list.append(n).unwrap();
    }

    assert_eq!(pool_list.allocator().capacity(), 16);

    let from_default = std::iter::from_fn(|| default_list.next_value()).collect::<Vec<_>>();
    let from_pool = std::iter::from_fn(|| pool_list.next_value()).collect::<Vec<_>>();
    assert_eq!(from_default, (0..10).collect::<Vec<_>>());
    assert_eq!(from_pool, from_default);
}

/// Stands in for an allocator that can only be used through its node allocator. It has no
/// `Default`, so containers must construct the rebound allocator directly.
#[derive(Debug)]
struct RebindOnly<T>(PhantomData<T>);

impl<T> SlotAllocator for RebindOnly<T> {
    type Item = T;
    type Rebind<U> = HeapAllocator<U>;

    fn allocate(&mut self, count: usize) -> Result<NonNull<T>, AllocError> {
        Err(AllocError::InvalidArgument { count })
    }

    unsafe fn deallocate(&mut self, _ptr: NonNull<T>, count: usize) -> Result<(), AllocError> {
        Err(AllocError::InvalidArgument { count })
    }

    fn capacity(&self) -> usize {
        0
    }

    fn allocated_count(&self) -> usize {
        0
    }

    fn select_on_copy(&self) -> Self {
        Self(PhantomData)
    }

    fn rebind<U>(&self) -> HeapAllocator<U> {
        HeapAllocator::new()
    }
}

#[test]
fn new_constructs_only_node_allocator() {
    let mut list = List::<u32, RebindOnly<u32>>::new();
    list.append(5).unwrap();
    assert_eq!(list.allocator().allocated_count(), 1);
    assert_eq!(list.next_value(), Some(5));

    let mut map = OrderedMap::<u32, u32, RebindOnly<(u32, u32)>>::default();
    map.insert(1, 2).unwrap();
    assert_eq!(map.allocator().allocated_count(), 1);
    assert_eq!(map.get(&1), Some(&2));
}

#[test]
fn containers_release_storage_on_drop() {
    let mut list = List::<u32, FixedAllocator<u32, 4>>::new();

    for value in 0..4 {
        list.append(value).unwrap();
    }

    assert!(list.append(4).is_err());

    drop(list);

    let mut list = List::<u32, FixedAllocator<u32, 4>>::new();
    for value in 0..4 {
        list.append(value).unwrap();
    }
    assert_eq!(list.len(), 4);
}

#[test]
fn moved_map_keeps_its_nodes() {
    let mut map = OrderedMap::<u8, char, ExtensiblePoolAllocator<(u8, char), 2>>::new();

    for (key, value) in [(3, 'c'), (1, 'a'), (2, 'b')] {
        map.insert(key, value).unwrap();
    }

    let moved = std::thread::spawn(move || map).join().unwrap();

    assert_eq!(moved.len(), 3);
    assert_eq!(moved.get(&2), Some(&'b'));
    assert_eq!(moved.allocator().allocated_count(), 3);
}

#[test]
fn map_swap_exchanges_contents() {
    let mut first = OrderedMap::<u8, u8>::new();
    let mut second = OrderedMap::<u8, u8>::new();

    first.insert(1, 10).unwrap();
    second.insert(2, 20).unwrap();
    second.insert(3, 30).unwrap();

    first.swap(&mut second);

    assert_eq!(first.len(), 2);
    assert_eq!(first.get(&3), Some(&30));
    assert_eq!(second.len(), 1);
    assert_eq!(second.get(&1), Some(&10));
}
