use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::any::type_name;
use std::marker::PhantomData;
use std::ptr::NonNull;

use tracing::trace;

use crate::{Error, Result, SlotAllocator};

/// An allocator that obtains storage for every request directly from the global allocator.
///
/// This is the allocator containers use when no other allocator is specified. It has no
/// capacity limit of its own and keeps no state besides the number of items outstanding.
/// All instances are interchangeable, so any two compare equal.
///
/// # Examples
///
/// ```
/// use slot_alloc::{HeapAllocator, SlotAllocator};
///
/// let mut allocator = HeapAllocator::<String>::new();
///
/// let ptr = allocator.allocate(2).unwrap();
/// assert_eq!(allocator.allocated_count(), 2);
///
/// // SAFETY: We pass the same pointer and count we received from allocate().
/// unsafe { allocator.deallocate(ptr, 2) }.unwrap();
/// assert_eq!(allocator.allocated_count(), 0);
/// ```
pub struct HeapAllocator<T> {
    /// Number of items allocated and not yet deallocated.
    count: usize,

    _item: PhantomData<fn() -> T>,
}

impl<T> HeapAllocator<T> {
    /// Creates a new heap allocator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: 0,
            _item: PhantomData,
        }
    }

    fn layout(count: usize) -> Result<Layout> {
        Layout::array::<T>(count).map_err(|_layout_error| Error::OutOfCapacity {
            requested: count,
            allocated: 0,
            capacity: isize::MAX.unsigned_abs() / size_of::<T>().max(1),
        })
    }
}

impl<T> Default for HeapAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for HeapAllocator<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for HeapAllocator<T> {}

impl<T> SlotAllocator for HeapAllocator<T> {
    type Item = T;
    type Rebind<U> = HeapAllocator<U>;

    fn allocate(&mut self, count: usize) -> Result<NonNull<T>> {
        let layout = Self::layout(count)?;

        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            // SAFETY: The layout is not zero-sized, checked above.
            let ptr = unsafe { alloc(layout) };

            let Some(ptr) = NonNull::new(ptr) else {
                handle_alloc_error(layout);
            };

            ptr.cast::<T>()
        };

        self.count = self.count.saturating_add(count);

        trace!(
            item = type_name::<T>(),
            requested = count,
            "allocated from global heap"
        );

        Ok(ptr)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) -> Result<()> {
        let layout = Self::layout(count)?;

        if layout.size() != 0 {
            // SAFETY: The caller guarantees `ptr` came from `allocate(count)` on this allocator,
            // which used the same layout.
            unsafe {
                dealloc(ptr.as_ptr().cast(), layout);
            }
        }

        self.count = self.count.saturating_sub(count);

        Ok(())
    }

    /// The global heap has no fixed capacity; this always returns `usize::MAX`.
    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn allocated_count(&self) -> usize {
        self.count
    }

    fn select_on_copy(&self) -> Self {
        Self::new()
    }

    fn rebind<U>(&self) -> HeapAllocator<U> {
        HeapAllocator::new()
    }
}

impl<T> std::fmt::Debug for HeapAllocator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapAllocator")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("count", &self.count)
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(HeapAllocator<u32>: Send, Sync, Debug, Default);

    #[test]
    fn allocate_write_read_deallocate() {
        let mut allocator = HeapAllocator::<String>::new();

        let ptr = allocator.allocate(1).unwrap();

        unsafe {
            ptr.write("hello".to_string());
            assert_eq!(ptr.as_ref(), "hello");
            ptr.drop_in_place();
        }

        assert_eq!(allocator.allocated_count(), 1);

        unsafe { allocator.deallocate(ptr, 1) }.unwrap();
        assert_eq!(allocator.allocated_count(), 0);
    }

    #[test]
    fn zero_sized_requests_do_not_touch_heap() {
        let mut allocator = HeapAllocator::<u32>::new();

        let ptr = allocator.allocate(0).unwrap();
        assert_eq!(ptr, NonNull::dangling());

        unsafe { allocator.deallocate(ptr, 0) }.unwrap();

        let mut unit_allocator = HeapAllocator::<()>::new();
        let unit = unit_allocator.allocate(5).unwrap();
        unsafe { unit_allocator.deallocate(unit, 5) }.unwrap();
    }

    #[test]
    fn oversized_request_is_out_of_capacity() {
        let mut allocator = HeapAllocator::<u64>::new();

        assert!(matches!(
            allocator.allocate(usize::MAX),
            Err(Error::OutOfCapacity { .. })
        ));
        assert_eq!(allocator.allocated_count(), 0);
    }

    #[test]
    fn all_instances_are_equal() {
        let mut a1 = HeapAllocator::<u32>::new();
        let a2 = HeapAllocator::<u32>::new();

        let ptr = a1.allocate(1).unwrap();
        assert_eq!(a1, a2);

        unsafe { a1.deallocate(ptr, 1) }.unwrap();
    }

    #[test]
    fn rebind_and_copy_are_fresh() {
        let mut allocator = HeapAllocator::<u8>::new();
        let ptr = allocator.allocate(4).unwrap();

        let rebound: HeapAllocator<u64> = allocator.rebind::<u64>();
        assert_eq!(rebound.allocated_count(), 0);

        let copy = allocator.select_on_copy();
        assert_eq!(copy.allocated_count(), 0);
        assert_eq!(copy.capacity(), usize::MAX);

        unsafe { allocator.deallocate(ptr, 4) }.unwrap();
    }
}
