use std::alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error};
use std::any::type_name;
use std::num::NonZero;
use std::ptr::NonNull;
use std::slice;

/// An owned heap block with room for a fixed number of items of type `T`.
///
/// The block only provides storage. It never creates, reads or drops values of type `T`, so
/// callers may write items through the pointers it hands out and are responsible for dropping
/// them. The memory is zero-initialized when the block is allocated, which gives every byte a
/// defined value for the raw byte comparison performed by [`bytes()`][1].
///
/// The block is released exactly once, when it is dropped.
///
/// [1]: Self::bytes
pub(crate) struct RawBlock<T> {
    first_item_ptr: NonNull<T>,

    /// Number of items of type `T` the block has room for.
    len: NonZero<usize>,
}

impl<T> RawBlock<T> {
    /// Allocates a new zero-initialized block with room for `len` items.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or if the block size overflows `isize::MAX`.
    #[must_use]
    pub(crate) fn new(len: NonZero<usize>) -> Self {
        assert!(
            size_of::<T>() > 0,
            "RawBlock must have non-zero item size but {} is zero-sized",
            type_name::<T>()
        );

        let layout = Self::layout(len);

        // SAFETY: The layout is not zero-sized because both the item size (asserted above) and
        // the item count (guaranteed by NonZero) are non-zero.
        let ptr = unsafe { alloc_zeroed(layout) };

        let Some(ptr) = NonNull::new(ptr) else {
            handle_alloc_error(layout);
        };

        Self {
            first_item_ptr: ptr.cast::<T>(),
            len,
        }
    }

    #[must_use]
    fn layout(len: NonZero<usize>) -> Layout {
        Layout::array::<T>(len.get()).expect("simple flat array layout must be calculable")
    }

    /// Number of items the block has room for.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.len.get()
    }

    /// Returns a pointer to the item slot at `index`.
    ///
    /// An `index` equal to the length of the block yields the one-past-the-end pointer, which
    /// is valid to compare against but not to read from or write to.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than the length of the block.
    #[must_use]
    pub(crate) fn item_ptr(&self, index: usize) -> NonNull<T> {
        assert!(
            index <= self.len.get(),
            "item {index} index out of bounds in block of {} with length {}",
            type_name::<T>(),
            self.len
        );

        // SAFETY: Guarded by bounds check above. The result stays within the allocation or
        // points one past its end, both of which are valid pointer offsets.
        unsafe { self.first_item_ptr.add(index) }
    }

    /// Returns the raw bytes of the first `item_count` item slots, regardless of whether the
    /// caller considers those slots occupied.
    ///
    /// The caller must not hold an exclusive reference into this range of the block while the
    /// returned slice is alive.
    ///
    /// # Panics
    ///
    /// Panics if `item_count` is greater than the length of the block.
    #[must_use]
    pub(crate) fn bytes(&self, item_count: usize) -> &[u8] {
        assert!(
            item_count <= self.len.get(),
            "byte range of {item_count} items out of bounds in block of {} with length {}",
            type_name::<T>(),
            self.len
        );

        // Cannot overflow because the full block size was validated by `layout()` when the
        // block was allocated and we are asking for no more than that.
        let byte_count = item_count.wrapping_mul(size_of::<T>());

        // SAFETY: The range lies within our allocation (bounds check above). Every byte was
        // zero-initialized on allocation. Item writes keep the bytes initialized unless the item
        // type has padding, which the allocators document as a caller obligation for equality.
        // The block itself never hands out references, only pointers.
        unsafe { slice::from_raw_parts(self.first_item_ptr.as_ptr().cast::<u8>(), byte_count) }
    }
}

impl<T> Drop for RawBlock<T> {
    fn drop(&mut self) {
        // SAFETY: The pointer came from `alloc_zeroed()` with the same layout and is only
        // released here, exactly once.
        unsafe {
            dealloc(self.first_item_ptr.as_ptr().cast(), Self::layout(self.len));
        }
    }
}

impl<T> std::fmt::Debug for RawBlock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBlock")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("first_item_ptr", &self.first_item_ptr)
            .field("len", &self.len)
            .finish()
    }
}

// SAFETY: Yes, there are raw pointers involved here but nothing inherently non-thread-mobile
// about it, so as long as T itself can move between threads, the block can do so, too.
unsafe impl<T: Send> Send for RawBlock<T> {}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::indexing_slicing,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::num::NonZero;

    use super::*;

    #[test]
    fn starts_zeroed() {
        let block = RawBlock::<u32>::new(NonZero::new(4).unwrap());

        assert_eq!(block.len(), 4);
        assert_eq!(block.bytes(4), &[0_u8; 16]);
    }

    #[test]
    fn item_ptrs_are_contiguous() {
        let block = RawBlock::<u64>::new(NonZero::new(3).unwrap());

        let first = block.item_ptr(0).as_ptr().addr();
        let second = block.item_ptr(1).as_ptr().addr();
        let end = block.item_ptr(3).as_ptr().addr();

        assert_eq!(second - first, size_of::<u64>());
        assert_eq!(end - first, 3 * size_of::<u64>());
    }

    #[test]
    fn item_ptrs_are_aligned() {
        let block = RawBlock::<u64>::new(NonZero::new(5).unwrap());

        for index in 0..5 {
            assert!(block.item_ptr(index).is_aligned());
        }
    }

    #[test]
    fn bytes_reflect_writes() {
        let block = RawBlock::<u16>::new(NonZero::new(2).unwrap());

        unsafe {
            block.item_ptr(1).write(0x0102_u16);
        }

        let bytes = block.bytes(2);
        assert_eq!(&bytes[0..2], &[0, 0]);
        assert_eq!(&bytes[2..4], &0x0102_u16.to_ne_bytes());

        // A prefix only covers the requested items.
        assert_eq!(block.bytes(1), &[0, 0]);
        assert!(block.bytes(0).is_empty());
    }

    #[test]
    #[should_panic]
    fn item_ptr_out_of_bounds_panics() {
        let block = RawBlock::<u32>::new(NonZero::new(2).unwrap());
        _ = block.item_ptr(3);
    }

    #[test]
    #[should_panic]
    fn bytes_out_of_bounds_panics() {
        let block = RawBlock::<u32>::new(NonZero::new(2).unwrap());
        _ = block.bytes(3);
    }

    #[test]
    #[should_panic]
    fn zero_sized_item_panics() {
        _ = RawBlock::<()>::new(NonZero::new(2).unwrap());
    }
}
