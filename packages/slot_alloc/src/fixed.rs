use std::any::type_name;
use std::mem;
use std::num::NonZero;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::{Error, RawBlock, Result, SlotAllocator};

/// A bump allocator over a single arena with room for exactly `CAPACITY` items of type `T`.
///
/// The arena is allocated when the allocator is created. Every [`allocate()`][1] call hands
/// out the next `count` consecutive slots; nothing is reused until the arena is reset.
///
/// # Whole-arena reset
///
/// [`deallocate()`][2] ignores its arguments and resets the allocator to an empty state. Any
/// previously handed out storage may be handed out again by later calls, so a container must
/// only deallocate once it no longer uses any storage from this allocator (e.g. when it is
/// being dropped).
///
/// # Equality
///
/// Two allocators are equal if they have allocated the same number of items and the raw bytes
/// of those items are identical. The comparison is a plain byte comparison of the arena and
/// does not call `PartialEq` on the items. Bytes in padding of `T` are not guaranteed to be
/// meaningful, so allocators for item types with padding may compare unequal even when the
/// items are logically equal. Do not compare an allocator while holding an exclusive reference
/// to any item in its arena.
///
/// # Moving
///
/// Use [`take()`][3] to move the arena into a new allocator while keeping the original value
/// alive in an empty state.
///
/// # Examples
///
/// ```
/// use slot_alloc::FixedAllocator;
///
/// let mut allocator = FixedAllocator::<u32, 3>::new();
///
/// let first = allocator.allocate(2).unwrap();
/// // SAFETY: The allocator returned storage for two u32 values.
/// unsafe {
///     first.write(1);
///     first.add(1).write(2);
/// }
///
/// assert_eq!(allocator.allocated_count(), 2);
/// assert!(allocator.allocate(2).is_err());
///
/// // Deallocating anything resets the whole arena.
/// allocator.deallocate(first, 1);
/// assert_eq!(allocator.allocated_count(), 0);
/// ```
///
/// [1]: Self::allocate
/// [2]: Self::deallocate
/// [3]: Self::take
pub struct FixedAllocator<T, const CAPACITY: usize> {
    /// `None` after the arena has been moved out via `take()`. A new arena is allocated on
    /// the next allocation in that case.
    arena: Option<RawBlock<T>>,

    /// The number of items handed out since the last reset. The next allocation starts at this
    /// item offset in the arena.
    count: usize,
}

impl<T, const CAPACITY: usize> FixedAllocator<T, CAPACITY> {
    /// Creates a new allocator and allocates its arena.
    ///
    /// # Panics
    ///
    /// Panics if `CAPACITY` is zero or `T` is zero-sized.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: Some(RawBlock::new(Self::arena_len())),
            count: 0,
        }
    }

    fn arena_len() -> NonZero<usize> {
        NonZero::new(CAPACITY).expect("FixedAllocator must have non-zero capacity")
    }

    /// Allocates storage for `count` consecutive items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfCapacity`] if the arena does not have room for `count` more
    /// items. The allocator state is unchanged in that case.
    pub fn allocate(&mut self, count: usize) -> Result<NonNull<T>> {
        let new_count = self
            .count
            .checked_add(count)
            .filter(|new_count| *new_count <= CAPACITY)
            .ok_or(Error::OutOfCapacity {
                requested: count,
                allocated: self.count,
                capacity: CAPACITY,
            })?;

        let arena = self.arena.get_or_insert_with(|| {
            debug!(
                item = type_name::<T>(),
                capacity = CAPACITY,
                "allocating arena for emptied fixed allocator"
            );

            RawBlock::new(Self::arena_len())
        });

        let ptr = arena.item_ptr(self.count);
        self.count = new_count;

        trace!(
            item = type_name::<T>(),
            requested = count,
            allocated = new_count,
            capacity = CAPACITY,
            "allocated from fixed arena"
        );

        Ok(ptr)
    }

    /// Resets the allocator, making the entire arena available again.
    ///
    /// Both arguments are ignored: this is not a per-item free. All storage handed out so far
    /// may be handed out again by subsequent allocations.
    pub fn deallocate(&mut self, _ptr: NonNull<T>, _count: usize) {
        debug!(
            item = type_name::<T>(),
            released = self.count,
            capacity = CAPACITY,
            "resetting fixed arena"
        );

        self.count = 0;
    }

    /// The number of items the arena has room for.
    #[must_use]
    pub fn capacity(&self) -> usize {
        CAPACITY
    }

    /// The number of items allocated since the last reset.
    #[must_use]
    pub fn allocated_count(&self) -> usize {
        self.count
    }

    /// Moves the arena and allocation state into a new allocator.
    ///
    /// The original allocator is left empty and owns no memory. It remains usable and will
    /// allocate a new arena if asked to allocate again.
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_alloc::FixedAllocator;
    ///
    /// let mut original = FixedAllocator::<u64, 4>::new();
    /// _ = original.allocate(2).unwrap();
    ///
    /// let moved = original.take();
    ///
    /// assert_eq!(moved.allocated_count(), 2);
    /// assert_eq!(original.allocated_count(), 0);
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::replace(
            self,
            Self {
                arena: None,
                count: 0,
            },
        )
    }

    /// Creates a new, empty allocator for use by a copy of a container. The arena content of
    /// this allocator is never copied.
    #[must_use]
    pub fn select_on_copy(&self) -> Self {
        Self::new()
    }
}

impl<T, const CAPACITY: usize> Default for FixedAllocator<T, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAPACITY: usize> PartialEq for FixedAllocator<T, CAPACITY> {
    fn eq(&self, other: &Self) -> bool {
        if self.count != other.count {
            return false;
        }

        if self.count == 0 {
            return true;
        }

        match (&self.arena, &other.arena) {
            (Some(ours), Some(theirs)) => ours.bytes(self.count) == theirs.bytes(other.count),
            // A non-zero count implies the arena exists, as the arena is only ever removed
            // together with resetting the count.
            _ => false,
        }
    }
}

impl<T, const CAPACITY: usize> Eq for FixedAllocator<T, CAPACITY> {}

impl<T, const CAPACITY: usize> SlotAllocator for FixedAllocator<T, CAPACITY> {
    type Item = T;
    type Rebind<U> = FixedAllocator<U, CAPACITY>;

    fn allocate(&mut self, count: usize) -> Result<NonNull<T>> {
        Self::allocate(self, count)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) -> Result<()> {
        Self::deallocate(self, ptr, count);
        Ok(())
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn allocated_count(&self) -> usize {
        Self::allocated_count(self)
    }

    fn select_on_copy(&self) -> Self {
        Self::select_on_copy(self)
    }

    fn rebind<U>(&self) -> FixedAllocator<U, CAPACITY> {
        FixedAllocator::new()
    }
}

impl<T, const CAPACITY: usize> std::fmt::Debug for FixedAllocator<T, CAPACITY> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedAllocator")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("capacity", &CAPACITY)
            .field("count", &self.count)
            .field("arena", &self.arena)
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::indexing_slicing,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(FixedAllocator<u32, 4>: Send, Debug, Default);
    assert_not_impl_any!(FixedAllocator<u32, 4>: Sync, Clone);

    #[test]
    fn smoke_test() {
        let mut allocator = FixedAllocator::<u32, 3>::new();

        assert_eq!(allocator.capacity(), 3);
        assert_eq!(allocator.allocated_count(), 0);

        let first = allocator.allocate(1).unwrap();
        let rest = allocator.allocate(2).unwrap();

        assert_eq!(allocator.allocated_count(), 3);

        unsafe {
            first.write(3);
            rest.write(8);
            rest.add(1).write(7);

            assert_eq!(first.read(), 3);
            assert_eq!(rest.read(), 8);
            assert_eq!(rest.add(1).read(), 7);
        }
    }

    #[test]
    fn allocations_are_consecutive() {
        let mut allocator = FixedAllocator::<u64, 4>::new();

        let first = allocator.allocate(1).unwrap();
        let second = allocator.allocate(2).unwrap();
        let third = allocator.allocate(1).unwrap();

        unsafe {
            assert_eq!(second, first.add(1));
            assert_eq!(third, first.add(3));
        }
    }

    #[test]
    fn zero_count_allocation_does_not_advance() {
        let mut allocator = FixedAllocator::<u32, 2>::new();

        let first = allocator.allocate(0).unwrap();
        let second = allocator.allocate(1).unwrap();

        assert_eq!(first, second);
        assert_eq!(allocator.allocated_count(), 1);
    }

    #[test]
    fn exceeding_capacity_fails_without_side_effects() {
        let mut allocator = FixedAllocator::<u32, 3>::new();

        _ = allocator.allocate(2).unwrap();

        let error = allocator.allocate(2).unwrap_err();
        assert_eq!(
            error,
            Error::OutOfCapacity {
                requested: 2,
                allocated: 2,
                capacity: 3,
            }
        );
        assert_eq!(allocator.allocated_count(), 2);

        // The remaining slot is still available.
        _ = allocator.allocate(1).unwrap();
        assert_eq!(allocator.allocated_count(), 3);

        assert!(matches!(
            allocator.allocate(1),
            Err(Error::OutOfCapacity { .. })
        ));
        assert_eq!(allocator.allocated_count(), 3);
    }

    #[test]
    fn overflowing_request_is_out_of_capacity() {
        let mut allocator = FixedAllocator::<u32, 3>::new();

        _ = allocator.allocate(1).unwrap();

        assert!(matches!(
            allocator.allocate(usize::MAX),
            Err(Error::OutOfCapacity { .. })
        ));
        assert_eq!(allocator.allocated_count(), 1);
    }

    #[test]
    fn deallocate_resets_everything() {
        let mut allocator = FixedAllocator::<u32, 4>::new();

        let first = allocator.allocate(1).unwrap();
        let second = allocator.allocate(3).unwrap();

        // Whatever pointer and count we pass, the whole arena is reset.
        allocator.deallocate(second, 1);
        assert_eq!(allocator.allocated_count(), 0);

        // The next allocation starts from the beginning again.
        let reused = allocator.allocate(4).unwrap();
        assert_eq!(reused, first);

        allocator.deallocate(NonNull::dangling(), 1000);
        assert_eq!(allocator.allocated_count(), 0);
    }

    #[test]
    fn fresh_allocators_are_equal() {
        let a1 = FixedAllocator::<u32, 3>::new();
        let a2 = FixedAllocator::<u32, 3>::new();

        assert_eq!(a1, a2);
    }

    #[test]
    fn equality_follows_item_bytes() {
        let mut a1 = FixedAllocator::<i32, 3>::new();
        let mut a2 = FixedAllocator::<i32, 3>::new();

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

        unsafe {
            p2.add(1).write(25);
        }

        assert_ne!(a1, a2);
    }

    #[test]
    fn equality_requires_matching_count() {
        let mut a1 = FixedAllocator::<u32, 3>::new();
        let mut a2 = FixedAllocator::<u32, 3>::new();

        // Both arenas are zeroed, so only the count differs.
        _ = a1.allocate(1).unwrap();
        _ = a2.allocate(2).unwrap();

        assert_ne!(a1, a2);
    }

    #[test]
    fn equality_ignores_bytes_beyond_count() {
        let mut a1 = FixedAllocator::<u32, 3>::new();
        let mut a2 = FixedAllocator::<u32, 3>::new();

        let p1 = a1.allocate(3).unwrap();
        let p2 = a2.allocate(3).unwrap();

        unsafe {
            p1.write(1);
            p2.write(1);
            p1.add(2).write(100);
            p2.add(2).write(200);
        }

        assert_ne!(a1, a2);

        // After a reset, only the first item is compared again.
        a1.deallocate(p1, 3);
        a2.deallocate(p2, 3);
        _ = a1.allocate(1).unwrap();
        _ = a2.allocate(1).unwrap();

        assert_eq!(a1, a2);
    }

    #[test]
    fn take_moves_state() {
        let mut a1 = FixedAllocator::<i32, 3>::new();
        let mut a2 = FixedAllocator::<i32, 3>::new();

        let p1 = a1.allocate(3).unwrap();
        let p2 = a2.allocate(3).unwrap();

        unsafe {
            for offset in 0..3 {
                p1.add(offset).write(10);
                p2.add(offset).write(10);
            }
        }

        let a3 = a1.take();

        assert_eq!(a3, a3);
        assert_eq!(a2, a3);
        assert_eq!(a3.allocated_count(), 3);
        assert_eq!(a1.allocated_count(), 0);
        assert_ne!(a1, a2);

        // The moved arena is still the one we wrote through.
        unsafe {
            p1.add(1).write(25);
        }

        assert_ne!(a2, a3);
    }

    #[test]
    fn taken_allocator_allocates_new_arena() {
        let mut a1 = FixedAllocator::<u32, 2>::new();
        let first = a1.allocate(2).unwrap();

        let a2 = a1.take();

        let fresh = a1.allocate(2).unwrap();
        assert_ne!(fresh, first);
        assert_eq!(a1.allocated_count(), 2);
        assert_eq!(a2.allocated_count(), 2);
    }

    #[test]
    fn select_on_copy_is_empty() {
        let mut allocator = FixedAllocator::<u32, 2>::new();
        let ptr = allocator.allocate(2).unwrap();

        unsafe {
            ptr.write(5);
        }

        let copy = allocator.select_on_copy();

        assert_eq!(copy.allocated_count(), 0);
        assert_eq!(copy.capacity(), 2);
        assert_ne!(copy, allocator);
    }

    #[test]
    fn rebind_keeps_capacity() {
        let allocator = FixedAllocator::<u8, 5>::new();

        let rebound: FixedAllocator<u64, 5> = SlotAllocator::rebind::<u64>(&allocator);

        assert_eq!(rebound.capacity(), 5);
        assert_eq!(rebound.allocated_count(), 0);
    }

    #[test]
    fn trait_deallocate_resets() {
        let mut allocator = FixedAllocator::<u32, 2>::new();

        let ptr = SlotAllocator::allocate(&mut allocator, 2).unwrap();
        unsafe { SlotAllocator::deallocate(&mut allocator, ptr, 2) }.unwrap();

        assert_eq!(SlotAllocator::allocated_count(&allocator), 0);
        assert_eq!(SlotAllocator::capacity(&allocator), 2);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        _ = FixedAllocator::<u32, 0>::new();
    }

    #[test]
    fn debug_names_item_type() {
        let allocator = FixedAllocator::<u16, 2>::new();

        let output = format!("{allocator:?}");
        assert!(output.contains("u16"));
        assert!(output.contains("capacity: 2"));
    }
}
