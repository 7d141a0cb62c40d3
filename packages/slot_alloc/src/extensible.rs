use std::any::type_name;
use std::iter;
use std::mem;
use std::num::NonZero;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::{
    Error, ExtensiblePoolAllocatorBuilder, RawBlock, Result, SlotAllocator, SlotCoordinates,
};

/// A single-item allocator that grows by whole pools of `POOL_SIZE` items of type `T`.
///
/// The allocator owns an ordered sequence of pools and an occupancy bitmap with one entry per
/// slot across all pools. Each [`allocate()`][1] call claims the free slot with the lowest
/// index; when every slot is occupied, a new pool is appended first. Pools are never released
/// before the allocator itself is dropped.
///
/// Only one item can be allocated or deallocated per call.
///
/// # Equality
///
/// Two allocators with nothing allocated are always equal, whatever their pool count. Otherwise,
/// they are equal if they have the same number of allocated items, the same number of pools
/// and identical raw bytes across the full extent of every pool. Vacant slots take part in the comparison, including stale bytes left behind by
/// items that were since deallocated. The comparison does not call `PartialEq` on the items.
/// Bytes in padding of `T` are not guaranteed to be meaningful, so allocators for item types
/// with padding may compare unequal even when the items are logically equal. Do not compare an
/// allocator while holding an exclusive reference to any item in its pools.
///
/// # Examples
///
/// ```
/// use slot_alloc::ExtensiblePoolAllocator;
///
/// let mut allocator = ExtensiblePoolAllocator::<u32, 2>::new();
/// assert_eq!(allocator.capacity(), 2);
///
/// let first = allocator.allocate(1).unwrap();
/// let _second = allocator.allocate(1).unwrap();
/// let _third = allocator.allocate(1).unwrap();
///
/// // The third allocation appended a second pool.
/// assert_eq!(allocator.capacity(), 4);
/// assert_eq!(allocator.allocated_count(), 3);
///
/// // Freed slots are reused before the allocator grows again.
/// allocator.deallocate(first, 1).unwrap();
/// assert_eq!(allocator.allocate(1).unwrap(), first);
/// assert_eq!(allocator.capacity(), 4);
/// ```
///
/// [1]: Self::allocate
pub struct ExtensiblePoolAllocator<T, const POOL_SIZE: usize> {
    pools: Vec<RawBlock<T>>,

    /// One entry per slot across all pools, in pool order. `true` means the slot is free.
    /// The length is always `pools.len() * POOL_SIZE`.
    vacant: Vec<bool>,

    /// Number of occupied slots, equal to the number of `false` entries in `vacant`.
    count: usize,
}

impl<T, const POOL_SIZE: usize> ExtensiblePoolAllocator<T, POOL_SIZE> {
    /// Creates a new allocator with a single pool.
    ///
    /// # Panics
    ///
    /// Panics if `POOL_SIZE` is zero or `T` is zero-sized.
    #[must_use]
    pub fn new() -> Self {
        Self::with_pool_count(1)
    }

    /// Creates a new allocator and eagerly allocates `pool_count` pools.
    ///
    /// A `pool_count` of zero is treated as one: the allocator always starts with a pool.
    ///
    /// # Panics
    ///
    /// Panics if `POOL_SIZE` is zero or `T` is zero-sized.
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_alloc::ExtensiblePoolAllocator;
    ///
    /// let allocator = ExtensiblePoolAllocator::<u64, 8>::with_pool_count(3);
    /// assert_eq!(allocator.capacity(), 24);
    ///
    /// let allocator = ExtensiblePoolAllocator::<u64, 8>::with_pool_count(0);
    /// assert_eq!(allocator.capacity(), 8);
    /// ```
    #[must_use]
    pub fn with_pool_count(pool_count: usize) -> Self {
        let pool_count = pool_count.max(1);

        let slot_count = pool_count
            .checked_mul(POOL_SIZE)
            .expect("pool count times pool size must not overflow usize");

        let pools = iter::repeat_with(|| RawBlock::new(Self::pool_len()))
            .take(pool_count)
            .collect();

        Self {
            pools,
            vacant: vec![true; slot_count],
            count: 0,
        }
    }

    /// Creates a builder for configuring and constructing an allocator.
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_alloc::ExtensiblePoolAllocator;
    ///
    /// let allocator = ExtensiblePoolAllocator::<u32, 4>::builder()
    ///     .pool_count(2)
    ///     .build();
    ///
    /// assert_eq!(allocator.pool_count(), 2);
    /// ```
    #[inline]
    pub fn builder() -> ExtensiblePoolAllocatorBuilder<T, POOL_SIZE> {
        ExtensiblePoolAllocatorBuilder::new()
    }

    fn pool_len() -> NonZero<usize> {
        NonZero::new(POOL_SIZE).expect("ExtensiblePoolAllocator must have non-zero pool size")
    }

    /// Allocates storage for a single item.
    ///
    /// If all slots are occupied, a new pool is appended first, so this only fails when
    /// `count` is not 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `count` is not 1.
    pub fn allocate(&mut self, count: usize) -> Result<NonNull<T>> {
        if count != 1 {
            return Err(Error::InvalidArgument { count });
        }

        #[cfg(debug_assertions)]
        self.integrity_check();

        if self.count == self.vacant.len() {
            self.grow();
        }

        let slot = self
            .vacant
            .iter()
            .position(|is_vacant| *is_vacant)
            .expect("we grow the allocator above when it is full, so a vacant slot must exist");

        *self
            .vacant
            .get_mut(slot)
            .expect("position() returned an index within the bitmap") = false;

        self.count = self
            .count
            .checked_add(1)
            .expect("count cannot exceed the number of slots in the bitmap");

        trace!(
            item = type_name::<T>(),
            slot,
            allocated = self.count,
            capacity = self.capacity(),
            "allocated pool slot"
        );

        Ok(self.slot_ptr(slot))
    }

    /// Returns a single item's storage to the allocator.
    ///
    /// If `ptr` does not point to an occupied slot of this allocator, the call does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `count` is not 1.
    pub fn deallocate(&mut self, ptr: NonNull<T>, count: usize) -> Result<()> {
        if count != 1 {
            return Err(Error::InvalidArgument { count });
        }

        #[cfg(debug_assertions)]
        self.integrity_check();

        let occupied_slot = self
            .vacant
            .iter()
            .enumerate()
            .filter(|(_, is_vacant)| !**is_vacant)
            .map(|(slot, _)| slot)
            .find(|slot| self.slot_ptr(*slot) == ptr);

        let Some(slot) = occupied_slot else {
            debug!(
                item = type_name::<T>(),
                ?ptr,
                "ignoring deallocation of pointer that is not an occupied slot"
            );
            return Ok(());
        };

        *self
            .vacant
            .get_mut(slot)
            .expect("we only consider slots that exist in the bitmap") = true;

        self.count = self
            .count
            .checked_sub(1)
            .expect("we found an occupied slot so count must be non-zero");

        trace!(
            item = type_name::<T>(),
            slot,
            allocated = self.count,
            capacity = self.capacity(),
            "released pool slot"
        );

        Ok(())
    }

    /// The number of items the current pools have room for.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    pub fn capacity(&self) -> usize {
        // Always equal to pools.len() * POOL_SIZE.
        self.vacant.len()
    }

    /// The number of items in each pool.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        POOL_SIZE
    }

    /// The number of pools currently owned by the allocator.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// The number of currently allocated items.
    #[must_use]
    pub fn allocated_count(&self) -> usize {
        self.count
    }

    /// Moves the pools and allocation state into a new allocator.
    ///
    /// The original allocator is left with no pools and no allocated items. It remains usable
    /// and will append a new pool if asked to allocate again.
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_alloc::ExtensiblePoolAllocator;
    ///
    /// let mut original = ExtensiblePoolAllocator::<u64, 4>::new();
    /// _ = original.allocate(1).unwrap();
    ///
    /// let moved = original.take();
    ///
    /// assert_eq!(moved.allocated_count(), 1);
    /// assert_eq!(original.allocated_count(), 0);
    /// assert_eq!(original.capacity(), 0);
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::replace(
            self,
            Self {
                pools: Vec::new(),
                vacant: Vec::new(),
                count: 0,
            },
        )
    }

    /// Creates a new, empty allocator with a single pool for use by a copy of a container.
    /// The content of this allocator is never copied.
    #[must_use]
    pub fn select_on_copy(&self) -> Self {
        Self::new()
    }

    fn grow(&mut self) {
        self.pools.push(RawBlock::new(Self::pool_len()));

        let new_slot_count = self
            .vacant
            .len()
            .checked_add(POOL_SIZE)
            .expect("slot count cannot overflow usize without first exhausting memory");
        self.vacant.resize(new_slot_count, true);

        debug!(
            item = type_name::<T>(),
            pool_count = self.pools.len(),
            capacity = new_slot_count,
            "appended pool"
        );
    }

    fn slot_ptr(&self, slot: usize) -> NonNull<T> {
        let coordinates = SlotCoordinates::from_slot(slot, POOL_SIZE);

        self.pools
            .get(coordinates.pool_index())
            .expect("every slot in the bitmap belongs to an existing pool")
            .item_ptr(coordinates.index_in_pool())
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    fn integrity_check(&self) {
        assert_eq!(
            Some(self.vacant.len()),
            self.pools.len().checked_mul(POOL_SIZE),
            "occupancy bitmap length does not match {} pools of {} in allocator of {}",
            self.pools.len(),
            POOL_SIZE,
            type_name::<T>()
        );

        let observed_occupied_count = self
            .vacant
            .iter()
            .filter(|is_vacant| !**is_vacant)
            .count();

        assert_eq!(
            self.count,
            observed_occupied_count,
            "count does not match the observed occupied slot count in allocator of {}",
            type_name::<T>()
        );
    }
}

impl<T, const POOL_SIZE: usize> Default for ExtensiblePoolAllocator<T, POOL_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const POOL_SIZE: usize> PartialEq for ExtensiblePoolAllocator<T, POOL_SIZE> {
    fn eq(&self, other: &Self) -> bool {
        if self.count != other.count {
            return false;
        }

        // Empty allocators are equal regardless of how many pools they own.
        if self.count == 0 {
            return true;
        }

        if self.pools.len() != other.pools.len() {
            return false;
        }

        self.pools
            .iter()
            .zip(&other.pools)
            .all(|(ours, theirs)| ours.bytes(ours.len()) == theirs.bytes(theirs.len()))
    }
}

impl<T, const POOL_SIZE: usize> Eq for ExtensiblePoolAllocator<T, POOL_SIZE> {}

impl<T, const POOL_SIZE: usize> SlotAllocator for ExtensiblePoolAllocator<T, POOL_SIZE> {
    type Item = T;
    type Rebind<U> = ExtensiblePoolAllocator<U, POOL_SIZE>;

    fn allocate(&mut self, count: usize) -> Result<NonNull<T>> {
        Self::allocate(self, count)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) -> Result<()> {
        Self::deallocate(self, ptr, count)
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

    fn rebind<U>(&self) -> ExtensiblePoolAllocator<U, POOL_SIZE> {
        ExtensiblePoolAllocator::new()
    }
}

impl<T, const POOL_SIZE: usize> std::fmt::Debug for ExtensiblePoolAllocator<T, POOL_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensiblePoolAllocator")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("pool_size", &POOL_SIZE)
            .field("pool_count", &self.pools.len())
            .field("count", &self.count)
            .field("vacant", &self.vacant)
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
    use std::collections::HashSet;
    use std::fmt::Debug;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(ExtensiblePoolAllocator<u32, 4>: Send, Debug, Default);
    assert_not_impl_any!(ExtensiblePoolAllocator<u32, 4>: Sync, Clone);

    #[test]
    fn starts_with_one_pool() {
        let allocator = ExtensiblePoolAllocator::<u32, 5>::new();

        assert_eq!(allocator.pool_count(), 1);
        assert_eq!(allocator.pool_size(), 5);
        assert_eq!(allocator.capacity(), 5);
        assert_eq!(allocator.allocated_count(), 0);
    }

    #[test]
    fn with_pool_count_allocates_eagerly() {
        let allocator = ExtensiblePoolAllocator::<u32, 5>::with_pool_count(3);

        assert_eq!(allocator.pool_count(), 3);
        assert_eq!(allocator.capacity(), 15);
        assert_eq!(allocator.allocated_count(), 0);
    }

    #[test]
    fn with_zero_pool_count_creates_one_pool() {
        let allocator = ExtensiblePoolAllocator::<u32, 5>::with_pool_count(0);

        assert_eq!(allocator.pool_count(), 1);
        assert_eq!(allocator.capacity(), 5);
    }

    #[test]
    fn grows_by_whole_pool() {
        let mut allocator = ExtensiblePoolAllocator::<u64, 3>::new();

        for _ in 0..3 {
            _ = allocator.allocate(1).unwrap();
        }

        assert_eq!(allocator.capacity(), 3);
        assert_eq!(allocator.pool_count(), 1);

        _ = allocator.allocate(1).unwrap();

        assert_eq!(allocator.capacity(), 6);
        assert_eq!(allocator.pool_count(), 2);
        assert_eq!(allocator.allocated_count(), 4);
    }

    #[test]
    fn allocations_are_distinct_and_aligned() {
        let mut allocator = ExtensiblePoolAllocator::<u64, 4>::new();

        let ptrs = (0..10)
            .map(|_| allocator.allocate(1).unwrap())
            .collect::<Vec<_>>();

        let unique = ptrs.iter().copied().collect::<HashSet<_>>();
        assert_eq!(unique.len(), 10);
        assert!(ptrs.iter().all(|ptr| ptr.is_aligned()));

        for (index, ptr) in ptrs.iter().enumerate() {
            unsafe {
                ptr.write(index as u64);
            }
        }

        for (index, ptr) in ptrs.iter().enumerate() {
            assert_eq!(unsafe { ptr.read() }, index as u64);
        }
    }

    #[test]
    fn reuses_lowest_free_slot() {
        let mut allocator = ExtensiblePoolAllocator::<u32, 2>::new();

        let p0 = allocator.allocate(1).unwrap();
        let p1 = allocator.allocate(1).unwrap();
        let p2 = allocator.allocate(1).unwrap();

        allocator.deallocate(p2, 1).unwrap();
        allocator.deallocate(p0, 1).unwrap();

        assert_eq!(allocator.allocated_count(), 1);
        assert_eq!(allocator.capacity(), 4);

        // The lowest free slot is claimed first, regardless of release order.
        assert_eq!(allocator.allocate(1).unwrap(), p0);
        assert_eq!(allocator.allocate(1).unwrap(), p2);

        allocator.deallocate(p1, 1).unwrap();
        assert_eq!(allocator.allocate(1).unwrap(), p1);

        assert_eq!(allocator.allocated_count(), 3);
        assert_eq!(allocator.capacity(), 4);
    }

    #[test]
    fn deallocate_then_allocate_keeps_counts() {
        let mut allocator = ExtensiblePoolAllocator::<u32, 3>::new();

        let ptrs = (0..5)
            .map(|_| allocator.allocate(1).unwrap())
            .collect::<Vec<_>>();

        allocator.deallocate(ptrs[1], 1).unwrap();
        _ = allocator.allocate(1).unwrap();

        assert_eq!(allocator.allocated_count(), 5);
        assert_eq!(allocator.capacity(), 6);
    }

    #[test]
    fn multi_item_requests_are_invalid() {
        let mut allocator = ExtensiblePoolAllocator::<u32, 3>::new();

        assert_eq!(
            allocator.allocate(3),
            Err(Error::InvalidArgument { count: 3 })
        );
        assert_eq!(
            allocator.allocate(0),
            Err(Error::InvalidArgument { count: 0 })
        );
        assert_eq!(allocator.allocated_count(), 0);

        let ptr = allocator.allocate(1).unwrap();

        assert_eq!(
            allocator.deallocate(ptr, 2),
            Err(Error::InvalidArgument { count: 2 })
        );
        assert_eq!(allocator.allocated_count(), 1);
    }

    #[test]
    fn foreign_pointer_deallocation_is_ignored() {
        let mut allocator = ExtensiblePoolAllocator::<u32, 3>::new();
        let mut other = ExtensiblePoolAllocator::<u32, 3>::new();

        _ = allocator.allocate(1).unwrap();
        let foreign = other.allocate(1).unwrap();

        allocator.deallocate(foreign, 1).unwrap();
        allocator.deallocate(NonNull::dangling(), 1).unwrap();

        assert_eq!(allocator.allocated_count(), 1);
        assert_eq!(other.allocated_count(), 1);
    }

    #[test]
    fn double_deallocation_is_ignored() {
        let mut allocator = ExtensiblePoolAllocator::<u32, 3>::new();

        let ptr = allocator.allocate(1).unwrap();
        _ = allocator.allocate(1).unwrap();

        allocator.deallocate(ptr, 1).unwrap();
        allocator.deallocate(ptr, 1).unwrap();

        assert_eq!(allocator.allocated_count(), 1);
    }

    #[test]
    fn equality_scenario() {
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

        unsafe {
            p1_1.write(78);
        }

        assert_ne!(a1, a2);

        unsafe {
            p2_1.write(78);
        }

        assert_eq!(a1, a2);

        let mut a3 = a1.take();

        assert_eq!(a3, a3);
        assert_eq!(a3, a2);
        assert_ne!(a1, a3);
        assert_eq!(a1.allocated_count(), 0);

        let p3_2 = a3.allocate(1).unwrap();

        assert_ne!(a2, a3);
        assert_eq!(a3.capacity(), 4);

        a3.deallocate(p3_2, 1).unwrap();

        assert_eq!(a3.allocated_count(), 2);
        assert!(matches!(
            a3.deallocate(p1_0, 2),
            Err(Error::InvalidArgument { count: 2 })
        ));
        assert!(matches!(
            a2.allocate(3),
            Err(Error::InvalidArgument { count: 3 })
        ));
    }

    #[test]
    fn equality_compares_vacant_slot_bytes() {
        let mut a1 = ExtensiblePoolAllocator::<u32, 2>::new();
        let mut a2 = ExtensiblePoolAllocator::<u32, 2>::new();

        let p1_0 = a1.allocate(1).unwrap();
        let p1_1 = a1.allocate(1).unwrap();
        let p2_0 = a2.allocate(1).unwrap();
        let p2_1 = a2.allocate(1).unwrap();

        unsafe {
            p1_0.write(1);
            p2_0.write(1);
            p1_1.write(10);
            p2_1.write(20);
        }

        // Release the differing slot in both. The stale bytes still differ.
        a1.deallocate(p1_1, 1).unwrap();
        a2.deallocate(p2_1, 1).unwrap();

        assert_eq!(a1.allocated_count(), a2.allocated_count());
        assert_ne!(a1, a2);
    }

    #[test]
    fn equality_requires_matching_pool_count() {
        let mut a1 = ExtensiblePoolAllocator::<u32, 2>::new();
        let mut a2 = ExtensiblePoolAllocator::<u32, 2>::with_pool_count(2);

        _ = a1.allocate(1).unwrap();
        _ = a2.allocate(1).unwrap();

        // Same count and all bytes zero, but a different number of pools.
        assert_ne!(a1, a2);
    }

    #[test]
    fn empty_allocators_with_same_pool_count_are_equal() {
        let mut a1 = ExtensiblePoolAllocator::<u32, 2>::new();
        let a2 = ExtensiblePoolAllocator::<u32, 2>::new();

        let ptr = a1.allocate(1).unwrap();
        unsafe {
            ptr.write(42);
        }
        a1.deallocate(ptr, 1).unwrap();

        // Nothing is allocated, so stale bytes do not matter.
        assert_eq!(a1, a2);
    }

    #[test]
    fn empty_allocators_are_equal_whatever_their_pool_count() {
        assert_eq!(
            ExtensiblePoolAllocator::<u32, 2>::with_pool_count(3),
            ExtensiblePoolAllocator::<u32, 2>::new()
        );

        let mut a1 = ExtensiblePoolAllocator::<i32, 2>::new();
        _ = a1.allocate(1).unwrap();
        _ = a1.allocate(1).unwrap();
        _ = a1.allocate(1).unwrap();

        let a2 = a1.take();

        assert_eq!(a1.capacity(), 0);
        assert_eq!(a1, ExtensiblePoolAllocator::<i32, 2>::new());
        assert_ne!(a2, ExtensiblePoolAllocator::<i32, 2>::new());
    }

    #[test]
    fn taken_allocator_grows_on_demand() {
        let mut a1 = ExtensiblePoolAllocator::<u32, 3>::new();
        _ = a1.allocate(1).unwrap();

        let a2 = a1.take();

        assert_eq!(a1.capacity(), 0);
        assert_eq!(a1.pool_count(), 0);

        _ = a1.allocate(1).unwrap();

        assert_eq!(a1.capacity(), 3);
        assert_eq!(a1.allocated_count(), 1);
        assert_eq!(a2.allocated_count(), 1);
    }

    #[test]
    fn select_on_copy_is_empty() {
        let mut allocator = ExtensiblePoolAllocator::<u32, 2>::with_pool_count(3);
        _ = allocator.allocate(1).unwrap();

        let copy = allocator.select_on_copy();

        assert_eq!(copy.allocated_count(), 0);
        assert_eq!(copy.pool_count(), 1);
        assert_eq!(copy.pool_size(), 2);
    }

    #[test]
    fn rebind_keeps_pool_size() {
        let allocator = ExtensiblePoolAllocator::<u8, 7>::new();

        let rebound: ExtensiblePoolAllocator<[u64; 4], 7> =
            SlotAllocator::rebind::<[u64; 4]>(&allocator);

        assert_eq!(rebound.pool_size(), 7);
        assert_eq!(rebound.capacity(), 7);
    }

    #[test]
    fn trait_operations_match_inherent() {
        let mut allocator = ExtensiblePoolAllocator::<u32, 2>::new();

        let ptr = SlotAllocator::allocate(&mut allocator, 1).unwrap();
        assert_eq!(SlotAllocator::allocated_count(&allocator), 1);

        unsafe { SlotAllocator::deallocate(&mut allocator, ptr, 1) }.unwrap();
        assert_eq!(SlotAllocator::allocated_count(&allocator), 0);
        assert_eq!(SlotAllocator::capacity(&allocator), 2);

        assert!(SlotAllocator::allocate(&mut allocator, 2).is_err());
    }

    #[test]
    #[should_panic]
    fn zero_pool_size_panics() {
        _ = ExtensiblePoolAllocator::<u32, 0>::new();
    }
}
