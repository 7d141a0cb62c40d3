use std::ptr::NonNull;

use crate::Result;

/// The contract between an allocator and the containers that obtain storage from it.
///
/// An allocator hands out raw, uninitialized storage for items of type [`Item`][1]. The
/// container constructs values in that storage, later destroys them and returns the storage
/// via [`deallocate()`][2]. The allocator never reads, writes or drops the values itself.
///
/// Containers usually need storage for an internal node type rather than for the value type
/// they were parameterized with. [`Rebind`][3] names the allocator with the same sizing policy
/// for a different item type, and [`rebind()`][4] creates a fresh instance of it.
///
/// Allocators are not `Clone`. A container that copies itself must obtain a new allocator
/// through [`select_on_copy()`][5], which never duplicates allocator content.
///
/// [1]: Self::Item
/// [2]: Self::deallocate
/// [3]: Self::Rebind
/// [4]: Self::rebind
/// [5]: Self::select_on_copy
pub trait SlotAllocator: Sized {
    /// The type of item the allocator provides storage for.
    type Item;

    /// The same kind of allocator, with the same sizing policy, for items of type `U`.
    type Rebind<U>: SlotAllocator<Item = U>;

    /// Allocates storage for `count` consecutive items and returns a pointer to the first.
    ///
    /// The storage is suitably aligned for [`Item`][Self::Item] but its contents are
    /// unspecified; the caller must initialize items before reading them.
    fn allocate(&mut self, count: usize) -> Result<NonNull<Self::Item>>;

    /// Returns storage previously obtained from [`allocate()`][Self::allocate].
    ///
    /// Any items in the storage must already have been dropped (or must be safe to leak).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by a call to `allocate(count)` on this allocator, with
    /// the same `count`, and must not have been deallocated since.
    unsafe fn deallocate(&mut self, ptr: NonNull<Self::Item>, count: usize) -> Result<()>;

    /// The number of items the allocator can currently hold.
    fn capacity(&self) -> usize;

    /// The number of items currently allocated.
    fn allocated_count(&self) -> usize;

    /// Creates the allocator to use for a copy of a container that uses this allocator.
    ///
    /// The result is always a brand-new, empty allocator with the same sizing policy.
    #[must_use]
    fn select_on_copy(&self) -> Self;

    /// Creates a fresh, empty allocator with the same sizing policy for items of type `U`.
    #[must_use]
    fn rebind<U>(&self) -> Self::Rebind<U>;
}
